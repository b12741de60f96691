//! References, assignment, subscripts and expression evaluation.

use vascal_core::lang::operators::{self, OperatorId};
use vascal_syntax::{Reporter, Token, TokenKind};

use crate::semantics::errors::SemanticError;
use crate::semantics::quads::{BackpatchList, UNRESOLVED};
use crate::semantics::stack::StackValue;
use crate::semantics::symbols::{DataType, EntryId};
use crate::semantics::{Engine, Operand, report};

impl Engine {
    // ========================================================================
    // REFERENCES
    // ========================================================================

    /// Statement target or call name.
    pub(in crate::semantics) fn push_variable(&mut self, token: &Token, reporter: &mut Reporter) {
        let id = self.resolve(token.text(), reporter);
        self.push_value(id);
    }

    /// Identifier or constant inside an expression.
    pub(in crate::semantics) fn push_factor(&mut self, token: &Token, reporter: &mut Reporter) {
        let id = match DataType::from_token_kind(token.kind()) {
            Some(ty) if token.kind() != TokenKind::Identifier => self.symbols.constant(token.text(), ty),
            _ => self.resolve(token.text(), reporter),
        };
        self.push_value(id);
    }

    /// Assignment target check. A function name stands for its result variable, but only inside that function.
    /// A procedure name is never a target.
    pub(in crate::semantics) fn check_assignment_target(&mut self, reporter: &mut Reporter) {
        let id = self.pop_value(reporter);
        let entry = self.symbols.entry(id);
        let (name, result, is_procedure) = (entry.name.clone(), entry.result(), entry.is_procedure());
        let target = match result {
            Some(result) if self.current_subroutine == Some(id) => result,
            Some(_) => self.abandon_assignment(&name, SemanticError::WrongFunction(name.clone()), reporter),
            None if is_procedure => self.abandon_assignment(&name, SemanticError::NonFunction(name.clone()), reporter),
            None => id,
        };
        self.push_value(target);
    }

    /// Report an invalid target and stand a placeholder in for it. The assignment then emits nothing.
    fn abandon_assignment(&mut self, name: &str, error: SemanticError, reporter: &mut Reporter) -> EntryId {
        report(reporter, error);
        self.assignment_aborted = true;
        self.placeholder(name, false)
    }

    /// Pop the offset slot and its entry; load array elements into a temporary.
    pub(in crate::semantics) fn finish_factor(&mut self) {
        let offset = self.stack.pop_offset().flatten();
        let id = self.pop_entry_or_error();
        let Some(offset) = offset else {
            self.push_value(id);
            return;
        };
        let temp = self.temp(self.type_of(id).unwrap_or(DataType::Integer));
        let (array, offset, target) = (self.address(id), self.address(offset), self.address(temp));
        self.emit("load", &[&array, &offset, &target]);
        self.push_value(temp);
    }

    // ========================================================================
    // ASSIGNMENT
    // ========================================================================

    pub(in crate::semantics) fn assign(&mut self, reporter: &mut Reporter) {
        let value = self.pop_value(reporter);
        let offset = self.stack.pop_offset().flatten();
        let target = self.pop_entry_or_error();

        if std::mem::take(&mut self.assignment_aborted) {
            return;
        }

        let source = match (self.type_of(target), self.type_of(value)) {
            (Some(DataType::Real), Some(DataType::Integer)) => self.widen(value),
            (Some(DataType::Integer), Some(DataType::Real)) => self.narrow(value),
            _ => self.operand(value),
        };
        let destination = self.address(target);
        match offset {
            Some(offset) => {
                let offset = self.address(offset);
                self.emit("stor", &[&source, &offset, &destination]);
            }
            None => {
                self.emit("move", &[&source, &destination]);
            }
        }
    }

    // ========================================================================
    // SUBSCRIPTS
    // ========================================================================

    pub(in crate::semantics) fn begin_subscript(&mut self, reporter: &mut Reporter) {
        let id = self.pop_value(reporter);
        let entry = self.symbols.entry(id);
        if !entry.is_array() && !entry.flags.error {
            report(reporter, SemanticError::VariableWithSubscripts(entry.name.clone()));
        }
        self.stack.push(StackValue::Entry(id));
    }

    /// Check the index, guard it against the bounds, and push the zero-based offset.
    pub(in crate::semantics) fn end_subscript(&mut self, reporter: &mut Reporter) {
        let index = self.pop_value(reporter);
        let array = self.pop_entry_or_error();

        let index_entry = self.symbols.entry(index);
        if index_entry.ty != Some(DataType::Integer) && !index_entry.flags.error {
            report(reporter, SemanticError::IntegerExpected(index_entry.name.clone()));
        }

        let index = self.operand(index);
        let (lower, upper) = self.symbols.entry(array).bounds().unwrap_or((0, 0));
        let lower = lower.to_string();
        if self.symbols.entry(array).is_array() {
            let below = self.emit("blt", &[&index, &lower, UNRESOLVED]);
            let above = self.emit("bgt", &[&index, &upper.to_string(), UNRESOLVED]);
            let failures = BackpatchList::make_list(below).merge(BackpatchList::make_list(above));
            self.emit_abort(failures, "Array index out of bounds");
        }

        let offset = self.temp(DataType::Integer);
        let target = self.address(offset);
        self.emit("sub", &[&index, &lower, &target]);
        self.stack.push(StackValue::Entry(array));
        self.stack.push(StackValue::Offset(Some(offset)));
    }

    // ========================================================================
    // COMPARISONS
    // ========================================================================

    pub(in crate::semantics) fn begin_comparison(&mut self, token: &Token, reporter: &mut Reporter) {
        let id = self.pop_value(reporter);
        self.stack.push(StackValue::Entry(id));
        self.stack.push(StackValue::Operator(token.clone()));
    }

    /// `b<op> a, b, _` then `goto _`: the True and False lists.
    pub(in crate::semantics) fn compare(&mut self, reporter: &mut Reporter) {
        let right = self.pop_value(reporter);
        let Some(op) = self.stack.pop_operator() else {
            self.push_lists(BackpatchList::new(), BackpatchList::new());
            return;
        };
        let left = self.pop_entry_or_error();

        let Some((a, b, real)) = self.coerce_pair(left, right) else {
            self.push_lists(BackpatchList::new(), BackpatchList::new());
            return;
        };
        let opcode = op.opcode().unwrap_or("beq");
        let opcode = if real { operators::real_opcode(opcode) } else { opcode.to_string() };
        let branch = self.emit(&opcode, &[&a, &b, UNRESOLVED]);
        let jump = self.emit("goto", &[UNRESOLVED]);
        self.push_lists(BackpatchList::make_list(branch), BackpatchList::make_list(jump));
    }

    pub(in crate::semantics) fn negate(&mut self, reporter: &mut Reporter) {
        let (truthy, falsy) = self.pop_lists(reporter);
        self.push_lists(falsy, truthy);
    }

    // ========================================================================
    // ARITHMETIC
    // ========================================================================

    pub(in crate::semantics) fn apply_sign(&mut self, reporter: &mut Reporter) {
        let operand = self.pop_operand();
        let sign = self.stack.pop_token();
        if sign.is_none_or(|sign| sign.kind() != TokenKind::UnaryMinus) {
            self.push_operand(operand);
            return;
        }
        let value = self.expect_value(operand, reporter);
        let Some(ty) = self.type_of(value) else {
            let placeholder = self.error_temp();
            self.push_value(placeholder);
            return;
        };
        let opcode = match ty {
            DataType::Integer => "uminus",
            DataType::Real => "fuminus",
        };
        let source = self.operand(value);
        let temp = self.temp(ty);
        let target = self.address(temp);
        self.emit(opcode, &[&source, &target]);
        self.push_value(temp);
    }

    /// Left operand of an ADDOP. OR resolves the left False list to the right operand's code.
    pub(in crate::semantics) fn begin_addop(&mut self, token: &Token, reporter: &mut Reporter) {
        if token.operator_id() == Some(OperatorId::Or) {
            let (truthy, falsy) = self.pop_lists(reporter);
            self.backpatch_here(&falsy);
            self.stack.push(StackValue::List(truthy));
        } else {
            let id = self.pop_value(reporter);
            self.stack.push(StackValue::Entry(id));
        }
        self.stack.push(StackValue::Operator(token.clone()));
    }

    pub(in crate::semantics) fn end_addop(&mut self, reporter: &mut Reporter) {
        let right = self.pop_operand();
        let Some(op) = self.stack.pop_operator() else {
            self.push_operand(right);
            return;
        };
        if op.operator_id() == Some(OperatorId::Or) {
            let (truthy, falsy) = self.expect_lists(right, reporter);
            let left = self.stack.pop_list().unwrap_or_default();
            self.push_lists(left.merge(truthy), falsy);
        } else {
            self.binary(&op, right, reporter);
        }
    }

    /// Left operand of a MULOP. AND resolves the left True list to the right operand's code.
    pub(in crate::semantics) fn begin_mulop(&mut self, token: &Token, reporter: &mut Reporter) {
        if token.operator_id() == Some(OperatorId::And) {
            let (truthy, falsy) = self.pop_lists(reporter);
            self.backpatch_here(&truthy);
            self.stack.push(StackValue::List(falsy));
        } else {
            let id = self.pop_value(reporter);
            self.stack.push(StackValue::Entry(id));
        }
        self.stack.push(StackValue::Operator(token.clone()));
    }

    pub(in crate::semantics) fn end_mulop(&mut self, reporter: &mut Reporter) {
        let right = self.pop_operand();
        let Some(op) = self.stack.pop_operator() else {
            self.push_operand(right);
            return;
        };
        if op.operator_id() == Some(OperatorId::And) {
            let (truthy, falsy) = self.expect_lists(right, reporter);
            let left = self.stack.pop_list().unwrap_or_default();
            self.push_lists(truthy, left.merge(falsy));
        } else {
            self.binary(&op, right, reporter);
        }
    }

    /// Pop the left operand and push `left op right`.
    fn binary(&mut self, op: &Token, right: Operand, reporter: &mut Reporter) {
        let right = self.expect_value(right, reporter);
        let left = self.pop_entry_or_error();
        let result = match op.operator_id() {
            Some(OperatorId::Mod) => self.modulus(left, right, reporter),
            Some(id) if self.type_check(left, right) == 4 => {
                tracing::debug!(op = operators::as_str(id), "operand without a numeric type");
                self.error_temp()
            }
            Some(OperatorId::Slash) => {
                let a = self.as_real(left);
                let b = self.as_real(right);
                self.store_result("fdiv", &a, &b, DataType::Real)
            }
            Some(OperatorId::Div) => {
                let a = self.as_integer(left);
                let b = self.as_integer(right);
                self.store_result("div", &a, &b, DataType::Integer)
            }
            Some(id) => match self.coerce_pair(left, right) {
                Some((a, b, true)) => {
                    let opcode = operators::real_opcode(operators::info_for(id).opcode);
                    self.store_result(&opcode, &a, &b, DataType::Real)
                }
                Some((a, b, false)) => self.store_result(operators::info_for(id).opcode, &a, &b, DataType::Integer),
                None => self.error_temp(),
            },
            None => self.error_temp(),
        };
        self.push_value(result);
    }

    fn store_result(&mut self, opcode: &str, a: &str, b: &str, ty: DataType) -> EntryId {
        let temp = self.temp(ty);
        let target = self.address(temp);
        self.emit(opcode, &[a, b, &target]);
        temp
    }

    fn as_real(&mut self, id: EntryId) -> String {
        match self.type_of(id) {
            Some(DataType::Integer) => self.widen(id),
            _ => self.operand(id),
        }
    }

    fn as_integer(&mut self, id: EntryId) -> String {
        match self.type_of(id) {
            Some(DataType::Real) => self.narrow(id),
            _ => self.operand(id),
        }
    }

    /// `a MOD b` as `a - (a div b) * b`, guarded against non-positive operands.
    fn modulus(&mut self, left: EntryId, right: EntryId, reporter: &mut Reporter) -> EntryId {
        if self.type_check(left, right) != 0 {
            let (a, b) = (self.symbols.entry(left).name.clone(), self.symbols.entry(right).name.clone());
            report(reporter, SemanticError::ModError(a, b));
            return self.error_temp();
        }
        let a = self.operand(left);
        let b = self.operand(right);
        let first = self.emit("ble", &[&a, "0", UNRESOLVED]);
        let second = self.emit("ble", &[&b, "0", UNRESOLVED]);
        let failures = BackpatchList::make_list(first).merge(BackpatchList::make_list(second));
        self.emit_abort(failures, "Modulus operand must be positive");

        let quotient = self.store_result("div", &a, &b, DataType::Integer);
        let quotient = self.address(quotient);
        let product = self.store_result("mul", &quotient, &b, DataType::Integer);
        let product = self.address(product);
        self.store_result("sub", &a, &product, DataType::Integer)
    }
}

#[cfg(test)]
mod tests {
    use vascal_syntax::TokenKind;

    use crate::semantics::Engine;

    #[test]
    fn test_type_check_table() {
        let mut engine = Engine::default();
        let int = engine.create("t", TokenKind::IntConstant);
        let real = engine.create("t", TokenKind::RealConstant);
        let proc = engine.symbols().lookup("MAIN").unwrap();
        assert_eq!(engine.type_check(int, int), 0);
        assert_eq!(engine.type_check(real, real), 1);
        assert_eq!(engine.type_check(real, int), 2);
        assert_eq!(engine.type_check(int, real), 3);
        assert_eq!(engine.type_check(proc, int), 4);
    }
}
