//! Source-syntax rendering of types and type packs.
//!
//! Used for log output (`dump_guesses`) and by hosts that turn a guess into
//! annotation text. Cycles render as `*CYCLE*`; over-long renderings are
//! truncated.

use crate::db::TypeDatabase;
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::types::{SingletonValue, TypeData, TypeFunctionInstance, TypeId, TypePackData, TypePackId};
use tyguess_common::limits::MAX_FORMATTED_TYPE_LEN;

pub struct TypeFormatter<'a> {
    db: &'a dyn TypeDatabase,
    types: RecursionGuard<TypeId>,
    packs: RecursionGuard<TypePackId>,
    max_len: usize,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(db: &'a dyn TypeDatabase) -> Self {
        Self {
            db,
            types: RecursionGuard::with_profile(RecursionProfile::Formatting),
            packs: RecursionGuard::with_profile(RecursionProfile::Formatting),
            max_len: MAX_FORMATTED_TYPE_LEN,
        }
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    pub fn format(&mut self, ty: TypeId) -> String {
        self.types.reset();
        self.packs.reset();
        let rendered = self.render(ty);
        self.truncate(rendered)
    }

    /// Render a pack as a parenthesized list: `(number, ...string)`.
    pub fn format_pack(&mut self, tp: TypePackId) -> String {
        self.types.reset();
        self.packs.reset();
        let rendered = format!("({})", self.render_pack_list(tp));
        self.truncate(rendered)
    }

    fn truncate(&self, mut rendered: String) -> String {
        if rendered.len() > self.max_len {
            let mut cut = self.max_len;
            while !rendered.is_char_boundary(cut) {
                cut -= 1;
            }
            rendered.truncate(cut);
            rendered.push_str("...");
        }
        rendered
    }

    fn render(&mut self, ty: TypeId) -> String {
        let ty = self.db.follow(ty);
        match self.types.enter(ty) {
            RecursionResult::Entered => {
                let rendered = self.render_data(ty);
                self.types.leave(ty);
                rendered
            }
            RecursionResult::Cycle => "*CYCLE*".to_string(),
            RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => "...".to_string(),
        }
    }

    fn render_data(&mut self, ty: TypeId) -> String {
        let Some(data) = self.db.lookup(ty) else {
            return format!("*dangling {}*", ty.0);
        };
        match data {
            TypeData::Primitive(kind) => kind.name().to_string(),
            TypeData::Singleton(SingletonValue::Boolean(value)) => value.to_string(),
            TypeData::Singleton(SingletonValue::String(value)) => format!("{value:?}"),
            TypeData::Unknown => "unknown".to_string(),
            TypeData::Any => "any".to_string(),
            TypeData::Never => "never".to_string(),
            TypeData::Error => "*error-type*".to_string(),
            TypeData::Free => format!("'t{}", ty.0),
            // only reachable when `follow` cut a bound cycle
            TypeData::Bound(_) => "*CYCLE*".to_string(),
            TypeData::Generic(param) => param.name,
            TypeData::Class(class) => class.name,
            TypeData::Function(shape) => {
                let mut out = String::new();
                if !shape.generics.is_empty() || !shape.generic_packs.is_empty() {
                    let mut names: Vec<String> =
                        shape.generics.iter().map(|&g| self.render(g)).collect();
                    names.extend(shape.generic_packs.iter().map(|&g| self.render_pack_element(g)));
                    out.push('<');
                    out.push_str(&names.join(", "));
                    out.push('>');
                }
                out.push('(');
                out.push_str(&self.render_pack_list(shape.params));
                out.push_str(") -> ");
                out.push_str(&self.render_returns(shape.returns));
                out
            }
            TypeData::Table(table) => {
                let mut fields: Vec<String> = table
                    .properties
                    .iter()
                    .map(|(name, prop)| format!("{name}: {}", self.render(*prop)))
                    .collect();
                if let Some((key, value)) = table.indexer {
                    fields.push(format!("[{}]: {}", self.render(key), self.render(value)));
                }
                if fields.is_empty() {
                    "{}".to_string()
                } else {
                    format!("{{ {} }}", fields.join(", "))
                }
            }
            TypeData::Union(members) => self.render_joined(&members, " | "),
            TypeData::Intersection(members) => self.render_joined(&members, " & "),
            TypeData::Instance(instance) => self.render_instance(&instance),
        }
    }

    fn render_joined(&mut self, members: &[TypeId], separator: &str) -> String {
        members
            .iter()
            .map(|&member| {
                let rendered = self.render(member);
                if matches!(self.db.lookup(self.db.follow(member)), Some(TypeData::Function(_))) {
                    format!("({rendered})")
                } else {
                    rendered
                }
            })
            .collect::<Vec<_>>()
            .join(separator)
    }

    fn render_instance(&mut self, instance: &TypeFunctionInstance) -> String {
        let mut operands: Vec<String> = instance
            .type_arguments
            .iter()
            .map(|&arg| self.render(arg))
            .collect();
        operands.extend(
            instance
                .pack_arguments
                .iter()
                .map(|&arg| format!("({})", self.render_pack_list(arg))),
        );
        format!("{}<{}>", instance.function.name(), operands.join(", "))
    }

    /// Comma-separated pack contents, tail included, without parentheses.
    fn render_pack_list(&mut self, tp: TypePackId) -> String {
        let tp = self.db.follow_pack(tp);
        match self.packs.enter(tp) {
            RecursionResult::Entered => {
                let rendered = match self.db.lookup_pack(tp) {
                    Some(TypePackData::List { head, tail }) => {
                        let mut elements: Vec<String> =
                            head.iter().map(|&ty| self.render(ty)).collect();
                        if let Some(tail) = tail {
                            let tail = self.render_pack_list(tail);
                            if !tail.is_empty() {
                                elements.push(tail);
                            }
                        }
                        elements.join(", ")
                    }
                    _ => self.render_pack_element(tp),
                };
                self.packs.leave(tp);
                rendered
            }
            RecursionResult::Cycle => "*CYCLE*".to_string(),
            RecursionResult::DepthExceeded | RecursionResult::IterationExceeded => "...".to_string(),
        }
    }

    /// A non-list pack rendered as one element of a list.
    fn render_pack_element(&mut self, tp: TypePackId) -> String {
        let tp = self.db.follow_pack(tp);
        match self.db.lookup_pack(tp) {
            Some(TypePackData::Variadic(element)) => format!("...{}", self.render(element)),
            Some(TypePackData::Generic(param)) => format!("{}...", param.name),
            Some(TypePackData::Free) => format!("'tp{}...", tp.0),
            Some(TypePackData::Instance(instance)) => self.render_instance(&instance),
            Some(TypePackData::List { .. }) => format!("({})", self.render_pack_list(tp)),
            Some(TypePackData::Bound(_)) => "*CYCLE*".to_string(),
            None => format!("*dangling pack {}*", tp.0),
        }
    }

    /// Return packs with exactly one fixed element render without parentheses.
    fn render_returns(&mut self, tp: TypePackId) -> String {
        let tp = self.db.follow_pack(tp);
        if let Some(TypePackData::List { head, tail: None }) = self.db.lookup_pack(tp)
            && head.len() == 1
        {
            return self.render(head[0]);
        }
        format!("({})", self.render_pack_list(tp))
    }
}

#[cfg(test)]
#[path = "../tests/format_tests.rs"]
mod tests;
