//! The tree-walking evaluator.
//!
//! Every statement and operator below follows the same execute/skip split
//! and `LoopState` cascade a cursor-based bytecode walker needs: a loop body
//! re-enters by rewinding the cursor to where the body started (the
//! encoding has no other way to re-read a body), but control flow itself
//! (`break`/`continue`/`return`) is threaded through an ordinary `&mut`
//! Rust value rather than a cursor rewind — the call stack already carries
//! it out of a loop.
//!
//! Every node is read through exactly one function, [`Interpreter::walk`],
//! parameterized by [`Mode`]. `Mode::Skip` takes the same branches and reads
//! the same bytes as `Mode::Exec`; it simply withholds the resulting value
//! and any host-visible effects (assignment, calls, imports, `print`).
//! Keeping both behaviours in one `match` is what keeps them from drifting
//! out of byte-alignment with each other.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, instrument};

use crate::diagnostic::Span;
use crate::encoding::{BinaryOpKind, BoolOpKind, CompareOp, Cursor, Encoding, NodeType, UnaryOpKind};
use crate::error::{Error, Result};
use crate::scope::Scope;
use crate::value::{equal, greater, greater_eq, Dictionary, List, Module, Value};

/// Resource caps for untrusted scripts. `None` means unlimited, which is
/// what every literal scenario in this crate's test suite runs under; a
/// host embedding this interpreter for real untrusted input should set both.
#[derive(Debug, Clone, Copy, Default)]
pub struct Limits {
    pub max_instructions: Option<u64>,
    pub max_recursion_depth: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    None,
    TopLevel,
    Normal,
    Break,
    Continue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Exec,
    Skip,
}

enum Target {
    Name(String),
    Tuple(String, String),
}

/// A rough, fixed per-element byte charge for lists/dicts built at runtime.
/// Values share structure (an `Rc`-cloned element costs nothing extra to
/// re-insert), so this is a conservative flat charge against the arena
/// budget rather than a precise `size_of` accounting.
const ENTRY_CHARGE: usize = 16;

/// Owns one compiled script's encoding, its arena, its root scope, and the
/// host module registry; `execute` walks the encoding exactly once.
pub struct Interpreter {
    encoding: Encoding,
    arena: crate::arena::Arena,
    root: Scope,
    modules: std::cell::RefCell<HashMap<String, Rc<dyn Module>>>,
    limits: Limits,
    instructions: Cell<u64>,
}

impl Interpreter {
    pub fn new(encoding: Encoding) -> Self {
        Interpreter {
            encoding,
            arena: crate::arena::Arena::new(),
            root: Scope::root(),
            modules: std::cell::RefCell::new(HashMap::new()),
            limits: Limits::default(),
            instructions: Cell::new(0),
        }
    }

    pub fn with_limits(encoding: Encoding, limits: Limits) -> Self {
        let mut me = Self::new(encoding);
        me.limits = limits;
        me
    }

    pub fn arena(&self) -> &crate::arena::Arena {
        &self.arena
    }

    pub fn set_string(&self, name: &str, value: impl Into<String>) {
        self.root.set(name, Value::string(value.into().as_str()));
    }

    pub fn set_list(&self, name: &str, values: Vec<String>) {
        let list = List::new(values.into_iter().map(|s| Value::string(s.as_str())).collect());
        self.root.set(name, Value::List(list));
    }

    pub fn set_module(&self, name: &str, module: Rc<dyn Module>) {
        self.modules.borrow_mut().insert(name.to_string(), module);
    }

    pub fn print_output(&self) -> Vec<String> {
        self.root.output().borrow().clone()
    }

    fn load_module(&self, name: &str) -> Result<Rc<dyn Module>> {
        if let Some(m) = self.modules.borrow().get(name) {
            return Ok(m.clone());
        }
        if name == "rand" {
            let module: Rc<dyn Module> = Rc::new(crate::modules::RandModule);
            self.modules.borrow_mut().insert(name.to_string(), module.clone());
            return Ok(module);
        }
        Err(Error::name_not_found(name, Span::unknown()))
    }

    fn tick_instruction(&self) -> Result<()> {
        let next = self.instructions.get() + 1;
        if let Some(limit) = self.limits.max_instructions {
            if next > limit {
                return Err(Error::InstructionLimitExceeded { limit });
            }
        }
        self.instructions.set(next);
        Ok(())
    }

    fn check_recursion(&self, depth: usize) -> Result<()> {
        if let Some(limit) = self.limits.max_recursion_depth {
            if depth > limit {
                return Err(Error::RecursionLimitExceeded { limit });
            }
        }
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn execute(&self) -> Result<bool> {
        let mut cursor = Cursor::new(&self.encoding);
        let mut loop_state = LoopState::None;
        let value = self.walk(&mut cursor, &self.root, &mut loop_state, Mode::Exec, 0)?;
        let result = if self.root.is_terminated() {
            self.root.result()
        } else {
            value
        };
        match result {
            Value::Bool(b) => {
                debug!(result = b, "script execution finished");
                Ok(b)
            }
            other => {
                let _ = other;
                Err(Error::ResultType)
            }
        }
    }

    fn read_target(&self, cur: &mut Cursor) -> Result<Target> {
        let tag = cur.read_tag()?;
        match tag {
            NodeType::Name | NodeType::String => Ok(Target::Name(cur.read_string()?)),
            NodeType::Tuple => {
                let a = self.read_target(cur)?;
                let b = self.read_target(cur)?;
                match (a, b) {
                    (Target::Name(x), Target::Name(y)) => Ok(Target::Tuple(x, y)),
                    _ => Err(Error::shape_error(
                        "nested tuple assignment targets are not supported",
                        Span::unknown(),
                    )),
                }
            }
            other => Err(Error::Encoding {
                message: format!("{other:?} is not a valid assignment target"),
            }),
        }
    }

    fn read_alias(&self, cur: &mut Cursor) -> Result<crate::value::Alias> {
        let tag = cur.read_tag()?;
        if tag != NodeType::Alias {
            return Err(Error::Encoding {
                message: format!("expected Alias node, found {tag:?}"),
            });
        }
        let name = cur.read_string()?;
        let has_as = cur.read_u8()?;
        let as_name = if has_as == 1 {
            Some(cur.read_string()?)
        } else {
            None
        };
        Ok(crate::value::Alias { name, as_name })
    }

    /// Read and evaluate (or structurally skip) one statement body: a
    /// 4-byte statement count followed by that many nodes. `exec_body`
    /// combines "are we in `Mode::Exec`" with "did the branch condition
    /// select this body" — once false every remaining statement is read in
    /// `Mode::Skip`, and once `return`/`break`/`continue` trips mid-body the
    /// rest of it is skipped too, exactly like `StatementList` does for its
    /// own children.
    fn walk_body(
        &self,
        cur: &mut Cursor,
        scope: &Scope,
        loop_state: &mut LoopState,
        depth: usize,
        exec_body: bool,
    ) -> Result<Value> {
        if exec_body && *loop_state == LoopState::TopLevel {
            *loop_state = LoopState::Normal;
        }
        let count = cur.read_u32()?;
        let mut result = Value::None;
        let mut dead = false;
        for _ in 0..count {
            let stmt_mode = if exec_body && !dead {
                Mode::Exec
            } else {
                Mode::Skip
            };
            result = self.walk(cur, scope, loop_state, stmt_mode, depth + 1)?;
            if exec_body
                && !dead
                && (scope.is_terminated() || matches!(*loop_state, LoopState::Break | LoopState::Continue))
            {
                dead = true;
            }
        }
        Ok(result)
    }

    fn walk(
        &self,
        cur: &mut Cursor,
        scope: &Scope,
        loop_state: &mut LoopState,
        mode: Mode,
        depth: usize,
    ) -> Result<Value> {
        self.check_recursion(depth)?;
        self.tick_instruction()?;
        let span = Span::unknown();
        let tag = cur.read_tag()?;

        match tag {
            NodeType::StatementList => {
                let count = cur.read_u32()?;
                let mut result = Value::None;
                let mut dead = false;
                for _ in 0..count {
                    let active = mode == Mode::Exec
                        && !dead
                        && !scope.is_terminated()
                        && !matches!(*loop_state, LoopState::Break | LoopState::Continue);
                    let stmt_mode = if active { Mode::Exec } else { Mode::Skip };
                    result = self.walk(cur, scope, loop_state, stmt_mode, depth + 1)?;
                    if mode == Mode::Exec
                        && !dead
                        && (scope.is_terminated()
                            || matches!(*loop_state, LoopState::Break | LoopState::Continue))
                    {
                        dead = true;
                    }
                }
                Ok(result)
            }

            NodeType::Name => {
                let name = cur.read_string()?;
                if mode == Mode::Exec {
                    scope.get(&name, span)
                } else {
                    Ok(Value::None)
                }
            }

            NodeType::String => {
                let s = cur.read_string()?;
                if mode == Mode::Exec {
                    self.arena.alloc(s.len())?;
                    Ok(Value::string(s.as_str()))
                } else {
                    Ok(Value::None)
                }
            }

            NodeType::Integer => {
                let n = cur.read_i32()?;
                if mode == Mode::Exec {
                    Ok(Value::Integer(n))
                } else {
                    Ok(Value::None)
                }
            }

            NodeType::Assign => {
                let target = self.read_target(cur)?;
                let value = self.walk(cur, scope, loop_state, mode, depth + 1)?;
                if mode == Mode::Exec {
                    match target {
                        Target::Name(name) => scope.set(&name, value),
                        Target::Tuple(a, b) => match value {
                            Value::Tuple(t) => {
                                scope.set(&a, t.0.clone());
                                scope.set(&b, t.1.clone());
                            }
                            other => {
                                return Err(Error::shape_error(
                                    format!(
                                        "cannot unpack '{}' into 2 names",
                                        other.type_name()
                                    ),
                                    span,
                                ))
                            }
                        },
                    }
                }
                Ok(Value::None)
            }

            NodeType::AugmentedAssign => {
                let op = BinaryOpKind::from_u8(cur.read_u8()?)?;
                let target = self.read_target(cur)?;
                let value = self.walk(cur, scope, loop_state, mode, depth + 1)?;
                if mode == Mode::Exec {
                    let name = match target {
                        Target::Name(name) => name,
                        Target::Tuple(..) => {
                            return Err(Error::shape_error(
                                "augmented assignment target must be a single name",
                                span,
                            ))
                        }
                    };
                    if op != BinaryOpKind::Add {
                        return Err(Error::UnimplementedOp {
                            op: format!("{op:?}"),
                            span,
                        });
                    }
                    let current = scope.get(&name, span)?;
                    let updated = match (&current, &value) {
                        (Value::Integer(a), Value::Integer(b)) => Value::Integer(a.wrapping_add(*b)),
                        _ => {
                            return Err(Error::type_error(
                                "augmented assignment requires int operands",
                                span,
                            ))
                        }
                    };
                    scope.set(&name, updated);
                }
                Ok(Value::None)
            }

            NodeType::Return => {
                let value = self.walk(cur, scope, loop_state, mode, depth + 1)?;
                if mode == Mode::Exec {
                    scope.terminate(value.clone());
                }
                Ok(value)
            }

            NodeType::Compare => {
                let left = self.walk(cur, scope, loop_state, mode, depth + 1)?;
                let count = cur.read_u32()?;
                let mut current = left;
                let mut result = true;
                for _ in 0..count {
                    let op = CompareOp::from_u8(cur.read_u8()?)?;
                    let rhs = self.walk(cur, scope, loop_state, mode, depth + 1)?;
                    if mode == Mode::Exec {
                        result = result && apply_compare(op, &current, &rhs, span)?;
                        current = rhs;
                    }
                }
                if mode == Mode::Exec {
                    Ok(Value::Bool(result))
                } else {
                    Ok(Value::None)
                }
            }

            NodeType::Dictionary => {
                let count = cur.read_u32()?;
                let dict = Dictionary::new();
                for _ in 0..count {
                    let key = self.walk(cur, scope, loop_state, mode, depth + 1)?;
                    let value = self.walk(cur, scope, loop_state, mode, depth + 1)?;
                    if mode == Mode::Exec {
                        match key {
                            Value::String(s) => dict.insert(s.to_string(), value),
                            other => {
                                return Err(Error::type_error(
                                    format!("dict keys must be strings, got '{}'", other.type_name()),
                                    span,
                                ))
                            }
                        }
                    }
                }
                if mode == Mode::Exec {
                    self.arena.alloc(dict.size() * ENTRY_CHARGE)?;
                    Ok(Value::Dictionary(dict))
                } else {
                    Ok(Value::None)
                }
            }

            NodeType::If => {
                let test = self.walk(cur, scope, loop_state, mode, depth + 1)?;
                let taken = mode == Mode::Exec && test.truthy();
                self.walk_body(cur, scope, loop_state, depth, taken)
            }

            NodeType::IfElse => {
                let test = self.walk(cur, scope, loop_state, mode, depth + 1)?;
                let take_if = mode == Mode::Exec && test.truthy();
                let take_else = mode == Mode::Exec && !test.truthy();
                let if_result = self.walk_body(cur, scope, loop_state, depth, take_if)?;
                let else_result = self.walk_body(cur, scope, loop_state, depth, take_else)?;
                Ok(if take_if {
                    if_result
                } else if take_else {
                    else_result
                } else {
                    Value::None
                })
            }

            NodeType::WhileLoop => {
                let test_start = cur.position();
                if mode == Mode::Skip {
                    self.walk(cur, scope, loop_state, Mode::Skip, depth + 1)?;
                    self.walk_body(cur, scope, loop_state, depth, false)?;
                    return Ok(Value::None);
                }
                let mut result = Value::None;
                loop {
                    cur.set_position(test_start);
                    let mut throwaway = LoopState::None;
                    let test = self.walk(cur, scope, &mut throwaway, Mode::Exec, depth + 1)?;
                    if !test.truthy() {
                        self.walk_body(cur, scope, loop_state, depth, false)?;
                        break;
                    }
                    let mut body_state = LoopState::TopLevel;
                    result = self.walk_body(cur, scope, &mut body_state, depth, true)?;
                    if scope.is_terminated() || body_state == LoopState::Break {
                        break;
                    }
                }
                Ok(result)
            }

            NodeType::ForLoop => {
                let ncount = cur.read_u8()?;
                let mut names = Vec::with_capacity(ncount as usize);
                for _ in 0..ncount {
                    names.push(cur.read_string()?);
                }
                let iter_val = self.walk(cur, scope, loop_state, mode, depth + 1)?;
                let body_start = cur.position();
                if mode == Mode::Skip {
                    self.walk_body(cur, scope, loop_state, depth, false)?;
                    return Ok(Value::None);
                }
                if !(iter_val.is_generator() || iter_val.can_iterate()) {
                    return Err(Error::type_error(
                        format!("'{}' object is not iterable", iter_val.type_name()),
                        span,
                    ));
                }
                let iterator = if iter_val.is_generator() {
                    iter_val.clone()
                } else {
                    iter_val.iterate()?
                };
                let mut result = Value::None;
                loop {
                    let item = match iterator.advance()? {
                        Some(v) => v,
                        None => break,
                    };
                    let child_scope = scope.child();
                    match names.as_slice() {
                        [single] => child_scope.set(single, item),
                        [a, b] => match item {
                            Value::Tuple(t) => {
                                child_scope.set(a, t.0.clone());
                                child_scope.set(b, t.1.clone());
                            }
                            other => {
                                return Err(Error::shape_error(
                                    format!("cannot unpack '{}' into 2 names", other.type_name()),
                                    span,
                                ))
                            }
                        },
                        _ => unreachable!("for-loop target arity is always 1 or 2"),
                    }
                    cur.set_position(body_start);
                    let mut body_state = LoopState::TopLevel;
                    result = self.walk_body(cur, &child_scope, &mut body_state, depth, true)?;
                    if child_scope.is_terminated() {
                        scope.terminate(child_scope.result());
                        break;
                    }
                    if body_state == LoopState::Break {
                        break;
                    }
                }
                // The reference implementation's skip_next always runs once
                // more after a for-loop ends, regardless of how it exited;
                // replicated here so the cursor lands past the body whether
                // the collection was empty or the loop broke early.
                cur.set_position(body_start);
                self.walk_body(cur, scope, &mut LoopState::None, depth, false)?;
                Ok(result)
            }

            NodeType::Break => {
                if mode == Mode::Exec {
                    if *loop_state == LoopState::None {
                        return Err(Error::LoopControlOutsideLoop { span });
                    }
                    *loop_state = LoopState::Break;
                }
                Ok(Value::None)
            }

            NodeType::Continue => {
                if mode == Mode::Exec {
                    if *loop_state == LoopState::None {
                        return Err(Error::LoopControlOutsideLoop { span });
                    }
                    *loop_state = LoopState::Continue;
                }
                Ok(Value::None)
            }

            NodeType::UnaryOp => {
                let op = UnaryOpKind::from_u8(cur.read_u8()?)?;
                let operand = self.walk(cur, scope, loop_state, mode, depth + 1)?;
                if mode != Mode::Exec {
                    return Ok(Value::None);
                }
                match op {
                    UnaryOpKind::Not => Ok(Value::Bool(!operand.truthy())),
                    UnaryOpKind::Neg => match operand {
                        Value::Integer(n) => Ok(Value::Integer(-n)),
                        other => Err(Error::type_error(
                            format!("bad operand type for unary -: '{}'", other.type_name()),
                            span,
                        )),
                    },
                    UnaryOpKind::Pos | UnaryOpKind::Invert => Err(Error::UnimplementedOp {
                        op: format!("{op:?}"),
                        span,
                    }),
                }
            }

            NodeType::BinaryOp => {
                let op = BinaryOpKind::from_u8(cur.read_u8()?)?;
                let left = self.walk(cur, scope, loop_state, mode, depth + 1)?;
                let right = self.walk(cur, scope, loop_state, mode, depth + 1)?;
                if mode == Mode::Exec {
                    apply_binary(op, &left, &right, span)
                } else {
                    Ok(Value::None)
                }
            }

            NodeType::BoolOp => {
                let op = BoolOpKind::from_u8(cur.read_u8()?)?;
                let count = cur.read_u32()?;
                if mode == Mode::Skip {
                    for _ in 0..count {
                        self.walk(cur, scope, loop_state, Mode::Skip, depth + 1)?;
                    }
                    return Ok(Value::None);
                }
                let mut result = Value::Bool(op == BoolOpKind::And);
                let mut decided = false;
                for _ in 0..count {
                    if decided {
                        self.walk(cur, scope, loop_state, Mode::Skip, depth + 1)?;
                        continue;
                    }
                    let v = self.walk(cur, scope, loop_state, Mode::Exec, depth + 1)?;
                    if !matches!(v, Value::Bool(_) | Value::None) {
                        return Err(Error::type_error(
                            format!("'and'/'or' operands must be bool, got '{}'", v.type_name()),
                            span,
                        ));
                    }
                    let stop = match op {
                        BoolOpKind::And => !v.truthy(),
                        BoolOpKind::Or => v.truthy(),
                    };
                    result = v;
                    if stop {
                        decided = true;
                    }
                }
                Ok(result)
            }

            NodeType::List => {
                let count = cur.read_u32()?;
                let mut elements = Vec::new();
                for _ in 0..count {
                    let v = self.walk(cur, scope, loop_state, mode, depth + 1)?;
                    if mode == Mode::Exec {
                        elements.push(v);
                    }
                }
                if mode == Mode::Exec {
                    self.arena.alloc(elements.len() * ENTRY_CHARGE)?;
                    Ok(Value::List(List::new(elements)))
                } else {
                    Ok(Value::None)
                }
            }

            NodeType::Tuple => {
                let first = self.walk(cur, scope, loop_state, mode, depth + 1)?;
                let second = self.walk(cur, scope, loop_state, mode, depth + 1)?;
                if mode == Mode::Exec {
                    Ok(Value::Tuple(Rc::new((first, second))))
                } else {
                    Ok(Value::None)
                }
            }

            NodeType::Index => self.walk(cur, scope, loop_state, mode, depth + 1),

            NodeType::Subscript => {
                let target = self.walk(cur, scope, loop_state, mode, depth + 1)?;
                let key = self.walk(cur, scope, loop_state, mode, depth + 1)?;
                if mode != Mode::Exec {
                    return Ok(Value::None);
                }
                match (&target, &key) {
                    (Value::Dictionary(d), Value::String(s)) => d.get(s).ok_or_else(|| {
                        Error::type_error(format!("key '{s}' not found"), span)
                    }),
                    (Value::List(l), Value::Integer(i)) => l.get(*i as i64).ok_or(Error::IndexOutOfRange {
                        index: *i as i64,
                        size: l.size(),
                        span,
                    }),
                    _ => Err(Error::type_error(
                        format!(
                            "'{}' is not subscriptable with '{}'",
                            target.type_name(),
                            key.type_name()
                        ),
                        span,
                    )),
                }
            }

            NodeType::Attribute => {
                let target = self.walk(cur, scope, loop_state, mode, depth + 1)?;
                let name = cur.read_string()?;
                if mode != Mode::Exec {
                    return Ok(Value::None);
                }
                match &target {
                    Value::Module(m) => m.get_member(&name),
                    Value::Dictionary(d) if name == "items" => Ok(Value::DictItems(d.clone())),
                    other => Err(Error::type_error(
                        format!("'{}' object has no attribute '{}'", other.type_name(), name),
                        span,
                    )),
                }
            }

            NodeType::Call => {
                let callee = self.walk(cur, scope, loop_state, mode, depth + 1)?;
                let count = cur.read_u32()?;
                let mut args = Vec::new();
                for _ in 0..count {
                    let a = self.walk(cur, scope, loop_state, mode, depth + 1)?;
                    if mode == Mode::Exec {
                        args.push(a);
                    }
                }
                if mode != Mode::Exec {
                    return Ok(Value::None);
                }
                if !callee.is_callable() {
                    return Err(Error::type_error(
                        format!("'{}' object is not callable", callee.type_name()),
                        span,
                    ));
                }
                callee.call(&args)
            }

            NodeType::Import => {
                let count = cur.read_u32()?;
                for _ in 0..count {
                    let alias = self.read_alias(cur)?;
                    if mode == Mode::Exec {
                        let module = self.load_module(&alias.name)?;
                        scope.set(alias.binding_name(), Value::Module(module));
                    }
                }
                Ok(Value::None)
            }

            NodeType::ImportFrom => {
                let module_name = cur.read_string()?;
                let count = cur.read_u32()?;
                for _ in 0..count {
                    let alias = self.read_alias(cur)?;
                    if mode == Mode::Exec {
                        let module = self.load_module(&module_name)?;
                        let member = module.get_member(&alias.name)?;
                        scope.set(alias.binding_name(), member);
                    }
                }
                Ok(Value::None)
            }

            NodeType::Alias => {
                let name = cur.read_string()?;
                let has_as = cur.read_u8()?;
                let as_name = if has_as == 1 {
                    Some(cur.read_string()?)
                } else {
                    None
                };
                if mode == Mode::Exec {
                    Ok(Value::Alias(Rc::new(crate::value::Alias { name, as_name })))
                } else {
                    Ok(Value::None)
                }
            }
        }
    }
}

fn apply_compare(op: CompareOp, left: &Value, right: &Value, span: Span) -> Result<bool> {
    match op {
        CompareOp::Eq => Ok(equal(left, right)),
        CompareOp::NotEq => Ok(!equal(left, right)),
        CompareOp::Lt => Ok(greater(right, left)),
        CompareOp::LtE => Ok(greater_eq(right, left)),
        CompareOp::Gt => Ok(greater(left, right)),
        CompareOp::GtE => Ok(greater_eq(left, right)),
        CompareOp::In => match right {
            Value::List(l) => Ok(l.contains(left)),
            other => Err(Error::type_error(
                format!("'in' requires a list, got '{}'", other.type_name()),
                span,
            )),
        },
        CompareOp::NotIn => match right {
            Value::List(l) => Ok(!l.contains(left)),
            other => Err(Error::type_error(
                format!("'not in' requires a list, got '{}'", other.type_name()),
                span,
            )),
        },
    }
}

fn apply_binary(op: BinaryOpKind, left: &Value, right: &Value, span: Span) -> Result<Value> {
    match op {
        BinaryOpKind::Add => match (left, right) {
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a.wrapping_add(*b))),
            (Value::String(a), Value::String(b)) => Ok(Value::string(format!("{a}{b}").as_str())),
            _ => Err(Error::type_error(
                format!(
                    "unsupported operand types for +: '{}' and '{}'",
                    left.type_name(),
                    right.type_name()
                ),
                span,
            )),
        },
        BinaryOpKind::Sub => match (left, right) {
            (Value::Integer(a), Value::Integer(b)) => Ok(Value::Integer(a.wrapping_sub(*b))),
            _ => Err(Error::type_error(
                format!(
                    "unsupported operand types for -: '{}' and '{}'",
                    left.type_name(),
                    right.type_name()
                ),
                span,
            )),
        },
        other => Err(Error::UnimplementedOp {
            op: format!("{other:?}"),
            span,
        }),
    }
}
