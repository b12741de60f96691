//! Declarations and subprogram structure.

use vascal_syntax::{Reporter, Token};

use crate::semantics::errors::SemanticError;
use crate::semantics::quads::UNRESOLVED;
use crate::semantics::stack::StackValue;
use crate::semantics::symbols::{DataType, Entry, ParamInfo};
use crate::semantics::{Engine, report};

impl Engine {
    /// Push the type named by a type keyword.
    pub(in crate::semantics) fn push_type(&mut self, token: &Token) {
        let ty = DataType::from_token_kind(token.kind()).unwrap_or(DataType::Integer);
        self.stack.push(StackValue::Type(ty));
    }

    /// Pop the two bound tokens pushed in array mode and leave array mode.
    ///
    /// Bounds are registered in the constant table. An upper bound below the lower one is raised to it, so every
    /// array has at least one cell.
    fn take_bounds(&mut self) -> Option<(i64, i64)> {
        if !std::mem::take(&mut self.array_mode) {
            return None;
        }
        let upper = self.stack.pop_token();
        let lower = self.stack.pop_token();
        let lower = self.bound_value(lower.as_ref());
        let upper = self.bound_value(upper.as_ref());
        Some((lower, upper.max(lower)))
    }

    fn bound_value(&mut self, token: Option<&Token>) -> i64 {
        let Some(token) = token else {
            return 0;
        };
        self.symbols.constant(token.text(), DataType::Integer);
        token.text().parse().unwrap_or(0)
    }

    /// Report why `name` cannot be declared in the active scope, if it cannot.
    fn check_declarable(&self, name: &str, reporter: &mut Reporter) -> bool {
        let reserved = self
            .symbols
            .lookup(name)
            .is_some_and(|id| self.symbols.entry(id).flags.reserved);
        if reserved {
            report(reporter, SemanticError::ReservedName(name.to_string()));
            false
        } else if self.symbols.lookup_active(name).is_some() {
            report(reporter, SemanticError::MultiplyDeclared(name.to_string()));
            false
        } else {
            true
        }
    }

    /// Declare the pending identifiers as variables or arrays of the popped type.
    ///
    /// Storage is handed out in pop order: in `VAR a, b: INTEGER` the name `b` gets the lower offset.
    pub(in crate::semantics) fn declare_variables(&mut self, reporter: &mut Reporter) {
        let ty = self.stack.pop_type().unwrap_or(DataType::Integer);
        let bounds = self.take_bounds();
        for token in self.stack.pop_tokens().into_iter().rev() {
            let name = token.text();
            if !self.check_declarable(name, reporter) {
                continue;
            }
            let mut entry = match bounds {
                Some((lower, upper)) => Entry::array(name, ty, lower, upper, 0),
                None => Entry::variable(name, ty, 0),
            };
            entry.address = self.allocate(entry.size());
            entry.flags.global = !self.symbols.in_local_scope();
            self.symbols.insert(entry);
        }
    }

    /// Program header: the program name and its identifier list become reserved procedures.
    pub(in crate::semantics) fn declare_program_header(&mut self) {
        for token in self.stack.pop_tokens() {
            let mut entry = Entry::procedure(token.text(), 0);
            entry.flags.reserved = true;
            self.symbols.insert_global(entry);
        }
        self.emit("call", &["main", "0"]);
        self.emit("exit", &[]);
    }

    pub(in crate::semantics) fn begin_main(&mut self) {
        self.emit("PROCBEGIN", &["main"]);
        self.global_alloc = Some(self.emit("alloc", &[UNRESOLVED]));
    }

    pub(in crate::semantics) fn end_main(&mut self) {
        let size = self.global_memory.to_string();
        if let Some(alloc) = self.global_alloc.take() {
            self.quads.patch_field(alloc, 1, size.as_str());
        }
        self.emit("free", &[&size]);
        self.emit("PROCEND", &[]);
    }

    /// Procedure or function header. Declares the subprogram globally and opens its local scope.
    pub(in crate::semantics) fn begin_subroutine(&mut self, token: &Token, is_function: bool, reporter: &mut Reporter) {
        let name = token.text();
        let valid = self.check_declarable(name, reporter);

        let entry = if is_function {
            let mut result = Entry::variable(format!("$${name}"), DataType::Integer, self.allocate(1));
            result.flags.global = true;
            result.flags.function_result = true;
            let result = self.symbols.insert_detached(result);
            Entry::function(name, result)
        } else {
            Entry::procedure(name, 0)
        };
        let id = if valid {
            self.symbols.insert_global(entry)
        } else {
            self.symbols.insert_detached(entry)
        };

        tracing::debug!(name, is_function, "enter subprogram");
        self.current_subroutine = Some(id);
        self.symbols.enter_local_scope();
        self.local_memory = 0;
        self.stack.push(StackValue::Counter(0));
    }

    pub(in crate::semantics) fn set_function_type(&mut self) {
        let ty = self.stack.pop_type().unwrap_or(DataType::Integer);
        let Some(id) = self.current_subroutine else {
            return;
        };
        let entry = self.symbols.entry_mut(id);
        entry.ty = Some(ty);
        if let Some(result) = entry.result() {
            self.symbols.entry_mut(result).ty = Some(ty);
        }
    }

    pub(in crate::semantics) fn record_parameter_count(&mut self) {
        let count = self.stack.pop_counter().unwrap_or(0);
        if let Some(signature) = self
            .current_subroutine
            .and_then(|id| self.symbols.entry_mut(id).signature_mut())
        {
            signature.declared_count = count;
        }
    }

    /// One parameter group `a, b: type`. Every parameter takes one local cell and adds a descriptor.
    pub(in crate::semantics) fn declare_parameters(&mut self, reporter: &mut Reporter) {
        let ty = self.stack.pop_type().unwrap_or(DataType::Integer);
        let bounds = self.take_bounds();
        let names = self.stack.pop_tokens();
        let count = self.stack.pop_counter().unwrap_or(0);

        for token in &names {
            let info = ParamInfo {
                ty,
                is_array: bounds.is_some(),
                bounds,
            };
            if let Some(signature) = self
                .current_subroutine
                .and_then(|id| self.symbols.entry_mut(id).signature_mut())
            {
                signature.params.push(info);
            }

            let slot = self.allocate(1);
            let name = token.text();
            if !self.check_declarable(name, reporter) {
                continue;
            }
            let mut entry = match bounds {
                Some((lower, upper)) => Entry::array(name, ty, lower, upper, slot),
                None => Entry::variable(name, ty, slot),
            };
            entry.flags.parameter = true;
            self.symbols.insert(entry);
        }

        self.stack.push(StackValue::Counter(count + names.len()));
    }

    pub(in crate::semantics) fn begin_subroutine_body(&mut self) {
        let name = self
            .current_subroutine
            .map(|id| self.symbols.entry(id).name.to_ascii_lowercase())
            .unwrap_or_default();
        self.emit("PROCBEGIN", &[&name]);
        self.local_alloc = Some(self.emit("alloc", &[UNRESOLVED]));
    }

    pub(in crate::semantics) fn end_subroutine_body(&mut self) {
        let size = self.local_memory.to_string();
        if let Some(alloc) = self.local_alloc.take() {
            self.quads.patch_field(alloc, 1, size.as_str());
        }
        self.emit("free", &[&size]);
        self.emit("PROCEND", &[]);
        self.symbols.exit_local_scope();
        self.current_subroutine = None;
        self.local_memory = 0;
    }
}
