//! Semantic action engine.
//!
//! The [`Engine`] receives every action symbol the parser pops and turns it into symbol table updates and
//! quadruples. It owns:
//! - the [`SymbolTable`] (global scope plus the local scope of the subprogram being compiled)
//! - the [`QuadStore`]
//! - an [`OperandStack`] shared by all actions
//!
//! Actions are grouped by concern under `actions/`.
//!
//! ## Notes
//! - Each compilation constructs a fresh engine; nothing is shared between runs.
//! - Recoverable errors are reported through the parser's `Reporter` and never unwind. The engine substitutes a
//!   placeholder entry, empty jump lists, or skips emission, and carries on.
//! - Quadruple 0 is the `CODE` header.

mod actions;
pub mod errors;
pub mod quads;
pub mod stack;
pub mod symbols;

use vascal_syntax::grammar::ActionId;
use vascal_syntax::{Reporter, SemanticActions, Token, TokenKind, UnknownAction};

use crate::config::CompileOptions;
use errors::SemanticError;
use quads::{BackpatchList, QuadStore, UNRESOLVED};
use stack::{EType, OperandStack, StackValue};
use symbols::{DataType, Entry, EntryId, SymbolTable};

/// A call whose arguments are being collected.
#[derive(Debug, Clone, Copy)]
struct CallFrame {
    callee: EntryId,
    count: usize,
    /// Set once the call is known to be invalid; nothing is emitted for it.
    poisoned: bool,
    /// Arrays named without subscripts inside the argument being collected.
    bare_arrays: usize,
}

/// An expression result popped from the operand stack.
enum Operand {
    Value(EntryId),
    Lists(BackpatchList, BackpatchList),
    Missing,
}

/// Syntax-directed translator state for one compilation.
#[derive(Debug)]
pub struct Engine {
    options: CompileOptions,
    symbols: SymbolTable,
    quads: QuadStore,
    stack: OperandStack,
    array_mode: bool,
    global_memory: i64,
    local_memory: i64,
    global_alloc: Option<usize>,
    local_alloc: Option<usize>,
    current_subroutine: Option<EntryId>,
    temp_counter: usize,
    calls: Vec<CallFrame>,
    assignment_aborted: bool,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(CompileOptions::default())
    }
}

impl Engine {
    pub fn new(options: CompileOptions) -> Self {
        let mut quads = QuadStore::new();
        quads.emit("CODE", Vec::<String>::new());
        Self {
            options,
            symbols: SymbolTable::new(),
            quads,
            stack: OperandStack::new(),
            array_mode: false,
            global_memory: 0,
            local_memory: 0,
            global_alloc: None,
            local_alloc: None,
            current_subroutine: None,
            temp_counter: 0,
            calls: Vec::new(),
            assignment_aborted: false,
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn quads(&self) -> &QuadStore {
        &self.quads
    }

    /// Cells allocated in the global scope so far, temporaries included.
    pub fn global_memory(&self) -> i64 {
        self.global_memory
    }

    /// Render the quadruple listing.
    pub fn render(&self) -> String {
        self.quads.render()
    }

    pub fn into_parts(self) -> (QuadStore, SymbolTable) {
        (self.quads, self.symbols)
    }

    // ========================================================================
    // STORAGE
    // ========================================================================

    /// Reserve `size` cells in the active scope and return the first offset.
    fn allocate(&mut self, size: i64) -> i64 {
        let memory = if self.symbols.in_local_scope() {
            &mut self.local_memory
        } else {
            &mut self.global_memory
        };
        let slot = *memory;
        *memory = memory.saturating_add(size);
        slot
    }

    /// Create a temporary named `$$<prefix><n>` typed after a token kind (identifiers default to INTEGER).
    pub fn create(&mut self, prefix: &str, kind: TokenKind) -> EntryId {
        let ty = DataType::from_token_kind(kind).unwrap_or(DataType::Integer);
        self.create_temp(prefix, ty)
    }

    fn create_temp(&mut self, prefix: &str, ty: DataType) -> EntryId {
        let name = format!("$${prefix}{}", self.temp_counter);
        self.temp_counter += 1;
        let slot = self.allocate(1);
        let mut entry = Entry::variable(name, ty, -slot - 1);
        entry.flags.global = !self.symbols.in_local_scope();
        self.symbols.insert(entry)
    }

    fn temp(&mut self, ty: DataType) -> EntryId {
        let prefix = self.options.temp_prefix.clone();
        self.create_temp(&prefix, ty)
    }

    /// Stand-in for an unusable operand. Carries the error flag so later checks stay quiet.
    fn error_temp(&mut self) -> EntryId {
        let id = self.temp(DataType::Integer);
        self.symbols.entry_mut(id).flags.error = true;
        id
    }

    /// INTEGER placeholder for `name`. Named placeholders go into the active scope so a name is reported once.
    fn placeholder(&mut self, name: &str, insert: bool) -> EntryId {
        let slot = self.allocate(1);
        let mut entry = Entry::variable(name, DataType::Integer, slot);
        entry.flags.error = true;
        entry.flags.global = !self.symbols.in_local_scope();
        if insert {
            self.symbols.insert(entry)
        } else {
            self.symbols.insert_detached(entry)
        }
    }

    /// Look up a referenced name, declaring a placeholder when it is missing.
    fn resolve(&mut self, name: &str, reporter: &mut Reporter) -> EntryId {
        match self.symbols.lookup(name) {
            Some(id) => id,
            None => {
                report(reporter, SemanticError::UndeclaredVariable(name.to_string()));
                self.placeholder(name, true)
            }
        }
    }

    // ========================================================================
    // OPERAND TEXT
    // ========================================================================

    /// Address text: `_n` global, `^n` parameter, `%n` local. Constants render as their literal.
    fn address(&self, id: EntryId) -> String {
        let entry = self.symbols.entry(id);
        if entry.is_constant() {
            entry.name.clone()
        } else if entry.flags.global {
            format!("_{}", entry.slot())
        } else if entry.flags.parameter {
            format!("^{}", entry.slot())
        } else {
            format!("%{}", entry.slot())
        }
    }

    /// Operand text for an instruction. Constants are first moved into a temporary.
    fn operand(&mut self, id: EntryId) -> String {
        let entry = self.symbols.entry(id);
        if !entry.is_constant() {
            return self.address(id);
        }
        let (literal, ty) = (entry.name.clone(), entry.ty.unwrap_or(DataType::Integer));
        let temp = self.temp(ty);
        let target = self.address(temp);
        self.emit("move", &[&literal, &target]);
        target
    }

    /// Pass-by-reference text for a call argument.
    fn reference(&mut self, id: EntryId) -> String {
        let entry = self.symbols.entry(id);
        if entry.flags.parameter {
            return format!("%{}", entry.slot());
        }
        let address = self.operand(id);
        format!("@{address}")
    }

    fn emit(&mut self, opcode: &str, operands: &[&str]) -> usize {
        self.quads.emit(opcode, operands.iter().copied())
    }

    /// Point every quadruple in `list` at the next instruction.
    fn backpatch_here(&mut self, list: &BackpatchList) {
        let target = self.quads.next_index();
        list.backpatch(&mut self.quads, target);
    }

    /// Emit a skip over an abort block, aim `failures` at the block, and emit `print <message>` / `exit`.
    fn emit_abort(&mut self, failures: BackpatchList, message: &str) {
        let skip = self.emit("goto", &[UNRESOLVED]);
        self.backpatch_here(&failures);
        self.emit("print", &[&format!("\"{message}\"")]);
        self.emit("exit", &[]);
        self.backpatch_here(&BackpatchList::make_list(skip));
    }

    // ========================================================================
    // TYPES
    // ========================================================================

    /// Classify an operand pair: 0 int/int, 1 real/real, 2 real/int, 3 int/real, 4 anything else.
    pub fn type_check(&self, left: EntryId, right: EntryId) -> u8 {
        match (self.symbols.entry(left).ty, self.symbols.entry(right).ty) {
            (Some(DataType::Integer), Some(DataType::Integer)) => 0,
            (Some(DataType::Real), Some(DataType::Real)) => 1,
            (Some(DataType::Real), Some(DataType::Integer)) => 2,
            (Some(DataType::Integer), Some(DataType::Real)) => 3,
            _ => 4,
        }
    }

    fn type_of(&self, id: EntryId) -> Option<DataType> {
        self.symbols.entry(id).ty
    }

    /// `ltof` an INTEGER operand into a fresh REAL temporary.
    fn widen(&mut self, id: EntryId) -> String {
        let source = self.operand(id);
        let temp = self.temp(DataType::Real);
        let target = self.address(temp);
        self.emit("ltof", &[&source, &target]);
        target
    }

    /// `ftol` a REAL operand into a fresh INTEGER temporary.
    fn narrow(&mut self, id: EntryId) -> String {
        let source = self.operand(id);
        let temp = self.temp(DataType::Integer);
        let target = self.address(temp);
        self.emit("ftol", &[&source, &target]);
        target
    }

    /// Operand texts for a binary operation, inserting `ltof` where the types differ. `None` for invalid types.
    fn coerce_pair(&mut self, left: EntryId, right: EntryId) -> Option<(String, String, bool)> {
        match self.type_check(left, right) {
            0 => Some((self.operand(left), self.operand(right), false)),
            1 => Some((self.operand(left), self.operand(right), true)),
            2 => Some((self.operand(left), self.widen(right), true)),
            3 => Some((self.widen(left), self.operand(right), true)),
            _ => None,
        }
    }

    // ========================================================================
    // OPERAND STACK
    // ========================================================================

    fn push_value(&mut self, id: EntryId) {
        self.stack.push(StackValue::Entry(id));
        self.stack.push(StackValue::EType(EType::Arithmetic));
    }

    fn push_lists(&mut self, truthy: BackpatchList, falsy: BackpatchList) {
        self.stack.push(StackValue::List(truthy));
        self.stack.push(StackValue::List(falsy));
        self.stack.push(StackValue::EType(EType::Relational));
    }

    fn push_operand(&mut self, operand: Operand) {
        match operand {
            Operand::Value(id) => self.push_value(id),
            Operand::Lists(truthy, falsy) => self.push_lists(truthy, falsy),
            Operand::Missing => {}
        }
    }

    fn pop_operand(&mut self) -> Operand {
        match self.stack.pop_etype() {
            Some(EType::Arithmetic) => self.stack.pop_entry().map_or(Operand::Missing, Operand::Value),
            Some(EType::Relational) => {
                let falsy = self.stack.pop_list().unwrap_or_default();
                let truthy = self.stack.pop_list().unwrap_or_default();
                Operand::Lists(truthy, falsy)
            }
            None => Operand::Missing,
        }
    }

    /// Require an arithmetic operand; a relational one is ETYPE_ERROR_A.
    fn expect_value(&mut self, operand: Operand, reporter: &mut Reporter) -> EntryId {
        match operand {
            Operand::Value(id) => id,
            Operand::Lists(..) => {
                report(reporter, SemanticError::ArithmeticExpected);
                self.error_temp()
            }
            Operand::Missing => self.error_temp(),
        }
    }

    /// Require a relational operand; an arithmetic one is ETYPE_ERROR_R.
    fn expect_lists(&mut self, operand: Operand, reporter: &mut Reporter) -> (BackpatchList, BackpatchList) {
        match operand {
            Operand::Lists(truthy, falsy) => (truthy, falsy),
            Operand::Value(_) => {
                report(reporter, SemanticError::RelationalExpected);
                (BackpatchList::new(), BackpatchList::new())
            }
            Operand::Missing => (BackpatchList::new(), BackpatchList::new()),
        }
    }

    fn pop_value(&mut self, reporter: &mut Reporter) -> EntryId {
        let operand = self.pop_operand();
        self.expect_value(operand, reporter)
    }

    fn pop_lists(&mut self, reporter: &mut Reporter) -> (BackpatchList, BackpatchList) {
        let operand = self.pop_operand();
        self.expect_lists(operand, reporter)
    }

    /// Pop an entry id that was pushed without a classification tag.
    fn pop_entry_or_error(&mut self) -> EntryId {
        match self.stack.pop_entry() {
            Some(id) => id,
            None => self.error_temp(),
        }
    }
}

fn report(reporter: &mut Reporter, error: impl Into<SemanticError>) {
    let error = error.into();
    reporter.report(error.code(), error.to_string());
}

impl SemanticActions for Engine {
    fn execute(&mut self, action: ActionId, token: &Token, reporter: &mut Reporter) -> Result<(), UnknownAction> {
        if self.options.trace_actions {
            tracing::trace!(%action, %token, depth = self.stack.len(), "semantic action");
        }
        match action.0 {
            3 => self.declare_variables(reporter),
            4 => self.push_type(token),
            5 => self.begin_subroutine_body(),
            6 => self.array_mode = true,
            7 | 13 => self.stack.push(StackValue::Token(token.clone())),
            9 => self.declare_program_header(),
            11 => self.end_subroutine_body(),
            15 => self.begin_subroutine(token, true, reporter),
            16 => self.set_function_type(),
            17 => self.begin_subroutine(token, false, reporter),
            20 => self.record_parameter_count(),
            21 => self.declare_parameters(reporter),
            22 | 25 => self.begin_branch(reporter),
            24 => self.mark_loop_entry(),
            26 => self.close_loop(),
            27 => self.begin_else(),
            28 => self.close_else(),
            29 => self.close_if(),
            30 => self.push_variable(token, reporter),
            31 => self.assign(reporter),
            32 => self.begin_subscript(reporter),
            33 => self.end_subscript(reporter),
            34 => self.bare_reference(reporter),
            35 => self.open_procedure_call(),
            36 => self.call_procedure_without_arguments(reporter),
            37 => self.collect_argument(reporter),
            38 => self.begin_comparison(token, reporter),
            39 => self.compare(reporter),
            40 => self.stack.push(StackValue::Token(token.clone())),
            41 => self.apply_sign(reporter),
            42 => self.begin_addop(token, reporter),
            43 => self.end_addop(reporter),
            44 => self.begin_mulop(token, reporter),
            45 => self.end_mulop(reporter),
            46 => self.push_factor(token, reporter),
            47 => self.negate(reporter),
            48 => self.finish_factor(),
            49 => self.open_function_call(reporter),
            50 => self.close_function_call(reporter),
            51 => self.close_procedure_call(reporter),
            52 => self.call_function_without_arguments(reporter),
            53 => self.check_assignment_target(reporter),
            54 => self.check_procedure_call(reporter),
            55 => self.end_main(),
            56 => self.begin_main(),
            _ => return Err(UnknownAction(action)),
        }
        Ok(())
    }

    fn on_recovery(&mut self) {
        self.stack.reset();
        self.calls.clear();
        self.array_mode = false;
        self.assignment_aborted = false;
    }

    fn finish(&mut self) {
        tracing::debug!(
            quads = self.quads.len(),
            global_memory = self.global_memory,
            leftover = self.stack.len(),
            "semantic actions finished"
        );
    }
}
