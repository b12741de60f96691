//! IF and WHILE.
//!
//! The condition leaves `(True, False)` lists on the stack. The True list is aimed at the body as soon as it
//! starts; the False list stays on the stack until the end of the construct is known.

use vascal_syntax::Reporter;

use crate::semantics::Engine;
use crate::semantics::quads::{BackpatchList, UNRESOLVED};
use crate::semantics::stack::StackValue;

impl Engine {
    /// After an IF or WHILE condition.
    pub(in crate::semantics) fn begin_branch(&mut self, reporter: &mut Reporter) {
        let (truthy, falsy) = self.pop_lists(reporter);
        self.backpatch_here(&truthy);
        self.stack.push(StackValue::List(falsy));
    }

    pub(in crate::semantics) fn mark_loop_entry(&mut self) {
        self.stack.push(StackValue::Quad(self.quads.next_index()));
    }

    pub(in crate::semantics) fn close_loop(&mut self) {
        let falsy = self.stack.pop_list().unwrap_or_default();
        let Some(entry) = self.stack.pop_quad() else {
            self.backpatch_here(&falsy);
            return;
        };
        self.emit("goto", &[&entry.to_string()]);
        self.backpatch_here(&falsy);
    }

    /// Then-branch done: skip the else-branch, and aim the False list at it.
    pub(in crate::semantics) fn begin_else(&mut self) {
        let falsy = self.stack.pop_list().unwrap_or_default();
        let skip = self.emit("goto", &[UNRESOLVED]);
        self.backpatch_here(&falsy);
        self.stack.push(StackValue::List(BackpatchList::make_list(skip)));
    }

    pub(in crate::semantics) fn close_else(&mut self) {
        let skip = self.stack.pop_list().unwrap_or_default();
        self.backpatch_here(&skip);
    }

    pub(in crate::semantics) fn close_if(&mut self) {
        let falsy = self.stack.pop_list().unwrap_or_default();
        self.backpatch_here(&falsy);
    }
}
