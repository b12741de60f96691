//! Procedure and function calls.
//!
//! Arguments are collected on the operand stack while a [`CallFrame`] counts and validates them. A frame that fails
//! validation is poisoned: the remaining arguments are still parsed, but nothing is emitted for the call.
//!
//! ## Notes
//! - READ and WRITE are expanded inline into one `print` plus one input/output instruction per argument.
//! - Arguments are passed by reference and regrouped before emission, see [`Engine::emit_params`].

use vascal_core::lang::builtins::{self, BuiltinProcId};
use vascal_syntax::Reporter;

use crate::semantics::errors::{CallError, SemanticError};
use crate::semantics::stack::StackValue;
use crate::semantics::symbols::{DataType, EntryId};
use crate::semantics::{CallFrame, Engine, report};

impl Engine {
    // ========================================================================
    // CALLEE CHECKS
    // ========================================================================

    /// Statement-level call: the name must be a procedure.
    pub(in crate::semantics) fn check_procedure_call(&mut self, reporter: &mut Reporter) {
        let id = self.pop_value(reporter);
        let entry = self.symbols.entry(id);
        if !entry.is_procedure() {
            report(reporter, SemanticError::NonProcedure(entry.name.clone()));
        }
        self.stack.push(StackValue::Entry(id));
    }

    pub(in crate::semantics) fn open_procedure_call(&mut self) {
        let callee = self.pop_entry_or_error();
        let poisoned = !self.symbols.entry(callee).is_procedure();
        self.open_frame(callee, poisoned);
    }

    pub(in crate::semantics) fn open_function_call(&mut self, reporter: &mut Reporter) {
        let callee = self.pop_value(reporter);
        let entry = self.symbols.entry(callee);
        let poisoned = !entry.is_function();
        if poisoned {
            report(reporter, SemanticError::NonFunction(entry.name.clone()));
        }
        self.open_frame(callee, poisoned);
    }

    fn open_frame(&mut self, callee: EntryId, poisoned: bool) {
        self.calls.push(CallFrame {
            callee,
            count: 0,
            poisoned,
            bare_arrays: 0,
        });
    }

    fn is_variadic(&self, callee: EntryId) -> bool {
        let entry = self.symbols.entry(callee);
        entry.flags.reserved && builtins::is_variadic(&entry.name)
    }

    // ========================================================================
    // ARGUMENTS
    // ========================================================================

    /// One argument: leave its entry on the stack and validate it against the frame.
    ///
    /// An array named without subscripts is only legal as the whole argument.
    pub(in crate::semantics) fn collect_argument(&mut self, reporter: &mut Reporter) {
        let argument = self.pop_value(reporter);
        self.stack.push(StackValue::Entry(argument));

        let whole_array = self.symbols.entry(argument).is_array();
        let Some(frame) = self.calls.last_mut() else {
            return;
        };
        frame.count += 1;
        let misused = std::mem::take(&mut frame.bare_arrays).saturating_sub(usize::from(whole_array));
        let frame = *frame;
        if misused > 0 {
            report(reporter, SemanticError::ArrayWithoutSubscripts);
        }
        if frame.poisoned || self.is_variadic(frame.callee) {
            return;
        }
        if let Err(err) = self.check_argument(frame.callee, frame.count, argument) {
            report(reporter, err);
            if let Some(frame) = self.calls.last_mut() {
                frame.poisoned = true;
            }
        }
    }

    /// Validate argument `position` (1-based): count, then type, then array shape.
    fn check_argument(&self, callee: EntryId, position: usize, argument: EntryId) -> Result<(), CallError> {
        let callee = self.symbols.entry(callee);
        let Some(signature) = callee.signature() else {
            return Ok(());
        };
        if position > signature.declared_count {
            return Err(CallError::Miscount {
                name: callee.name.clone(),
                expected: signature.declared_count,
                found: position,
            });
        }
        let Some(param) = signature.params.get(position - 1) else {
            return Ok(());
        };

        let argument = self.symbols.entry(argument);
        if argument.ty != Some(param.ty) {
            return Err(CallError::UnmatchedTypes {
                name: callee.name.clone(),
                position,
                expected: param.ty.to_string(),
                found: argument.ty.map_or_else(|| "no type".to_string(), |ty| ty.to_string()),
            });
        }
        if argument.is_array() != param.is_array || (param.is_array && argument.bounds() != param.bounds) {
            return Err(CallError::ArrayParameter {
                name: callee.name.clone(),
                position,
            });
        }
        Ok(())
    }

    /// Report a call with too few arguments. True when the call may be emitted.
    fn check_count(&self, frame: &CallFrame, reporter: &mut Reporter) -> bool {
        if frame.poisoned {
            return false;
        }
        let callee = self.symbols.entry(frame.callee);
        let declared = callee.signature().map_or(0, |s| s.declared_count);
        if frame.count < declared {
            report(
                reporter,
                CallError::Miscount {
                    name: callee.name.clone(),
                    expected: declared,
                    found: frame.count,
                },
            );
            return false;
        }
        true
    }

    // ========================================================================
    // EMISSION
    // ========================================================================

    /// `param` every argument, then `call name, n`.
    ///
    /// Arguments are split into maximal runs of equal `(type, is_array)`; runs keep their order and each run is
    /// emitted in reverse.
    fn emit_params(&mut self, arguments: &[EntryId]) {
        let key = |id: EntryId| {
            let entry = self.symbols.entry(id);
            (entry.ty, entry.is_array())
        };
        let runs: Vec<Vec<EntryId>> = arguments
            .chunk_by(|a, b| key(*a) == key(*b))
            .map(<[EntryId]>::to_vec)
            .collect();
        for run in runs {
            for &argument in run.iter().rev() {
                let reference = self.reference(argument);
                self.emit("param", &[&reference]);
            }
        }
    }

    fn emit_call(&mut self, callee: EntryId, arguments: &[EntryId]) {
        self.emit_params(arguments);
        let name = self.symbols.entry(callee).name.to_ascii_lowercase();
        self.emit("call", &[&name, &arguments.len().to_string()]);
    }

    /// Inline READ/WRITE: a prompt, then `inp`/`finp` or `outp`/`foutp`.
    fn expand_io(&mut self, builtin: BuiltinProcId, arguments: &[EntryId]) {
        for &argument in arguments {
            let entry = self.symbols.entry(argument);
            let label = if entry.is_temporary() {
                "<value>".to_string()
            } else {
                entry.name.clone()
            };
            let real = entry.ty == Some(DataType::Real);
            let (prompt, opcode) = match (builtin, real) {
                (BuiltinProcId::Read, false) => (format!("\"{label} ? \""), "inp"),
                (BuiltinProcId::Read, true) => (format!("\"{label} ? \""), "finp"),
                (_, false) => (format!("\"{label} = \""), "outp"),
                (_, true) => (format!("\"{label} = \""), "foutp"),
            };
            self.emit("print", &[&prompt]);
            let operand = self.operand(argument);
            self.emit(opcode, &[&operand]);
        }
    }

    /// Move a function's result variable into a fresh temporary.
    fn fetch_result(&mut self, callee: EntryId) -> EntryId {
        let entry = self.symbols.entry(callee);
        let (Some(result), Some(ty)) = (entry.result(), entry.ty) else {
            return self.error_temp();
        };
        let temp = self.temp(ty);
        let (source, target) = (self.address(result), self.address(temp));
        self.emit("move", &[&source, &target]);
        temp
    }

    // ========================================================================
    // CALL CLOSE
    // ========================================================================

    pub(in crate::semantics) fn close_procedure_call(&mut self, reporter: &mut Reporter) {
        let Some(frame) = self.calls.pop() else {
            return;
        };
        let arguments = self.stack.pop_entries(frame.count);
        if frame.poisoned {
            return;
        }
        let builtin = builtins::from_str(&self.symbols.entry(frame.callee).name);
        match builtin {
            Some(builtin) if self.is_variadic(frame.callee) => self.expand_io(builtin, &arguments),
            _ if self.check_count(&frame, reporter) => self.emit_call(frame.callee, &arguments),
            _ => {}
        }
    }

    pub(in crate::semantics) fn close_function_call(&mut self, reporter: &mut Reporter) {
        let result = match self.calls.pop() {
            Some(frame) => {
                let arguments = self.stack.pop_entries(frame.count);
                if self.check_count(&frame, reporter) {
                    self.emit_call(frame.callee, &arguments);
                    self.fetch_result(frame.callee)
                } else {
                    self.error_temp()
                }
            }
            None => self.error_temp(),
        };
        self.stack.push(StackValue::Entry(result));
        self.stack.push(StackValue::Offset(None));
    }

    /// Procedure statement without an argument list.
    pub(in crate::semantics) fn call_procedure_without_arguments(&mut self, reporter: &mut Reporter) {
        let callee = self.pop_entry_or_error();
        if !self.symbols.entry(callee).is_procedure() || self.is_variadic(callee) {
            return;
        }
        let frame = CallFrame {
            callee,
            count: 0,
            poisoned: false,
            bare_arrays: 0,
        };
        if self.check_count(&frame, reporter) {
            self.emit_call(callee, &[]);
        }
    }

    /// Function reference without an argument list.
    pub(in crate::semantics) fn call_function_without_arguments(&mut self, reporter: &mut Reporter) {
        let callee = self.pop_value(reporter);
        let frame = CallFrame {
            callee,
            count: 0,
            poisoned: !self.symbols.entry(callee).is_function(),
            bare_arrays: 0,
        };
        let result = if self.check_count(&frame, reporter) {
            self.emit_call(callee, &[]);
            self.fetch_result(callee)
        } else {
            self.error_temp()
        };
        self.stack.push(StackValue::Entry(result));
        self.stack.push(StackValue::Offset(None));
    }

    /// Name without subscripts or arguments. A function here is a call and a procedure has no value.
    ///
    /// Inside an argument list a bare array is counted on the open frame and checked when the argument is collected.
    pub(in crate::semantics) fn bare_reference(&mut self, reporter: &mut Reporter) {
        let id = self.pop_value(reporter);
        let entry = self.symbols.entry(id);
        if entry.is_function() {
            self.push_value(id);
            self.call_function_without_arguments(reporter);
            return;
        }
        let id = if entry.is_procedure() {
            report(reporter, SemanticError::NonFunction(entry.name.clone()));
            self.error_temp()
        } else {
            if entry.is_array() {
                match self.calls.last_mut() {
                    Some(frame) => frame.bare_arrays += 1,
                    None => report(reporter, SemanticError::ArrayWithoutSubscripts),
                }
            }
            id
        };
        self.stack.push(StackValue::Entry(id));
        self.stack.push(StackValue::Offset(None));
    }
}
