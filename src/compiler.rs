//! Turns a `rustpython_parser` AST into the linear [`Encoding`] the
//! evaluator walks.
//!
//! The front end (tokenizer/parser/grammar) is someone else's job; this
//! module's only responsibility starts where `rustpython_parser` leaves off.
//! The node shapes it emits follow this language's authoritative node-type
//! set (`NodeType`, see [`crate::encoding`]) — notably there is
//! no dedicated node for boolean or `None` literals. `None` is therefore
//! compiled as a `Name` lookup (the scope resolves it specially, see
//! [`crate::scope`]), and a literal `True`/`False` is synthesized as a
//! trivially true/false `Compare` node, since boolean values only otherwise
//! arise from comparisons and `and`/`or` expressions in this subset.

use rustpython_parser::ast::{self, Constant, Stmt};
use rustpython_parser::Parse;

use crate::encoding::{BinaryOpKind, BoolOpKind, CompareOp, Encoding, NodeType, UnaryOpKind};
use crate::error::{Error, Result};

pub fn compile_source(source: &str) -> Result<Encoding> {
    let module = ast::Suite::parse(source, "<script>").map_err(|e| Error::Parse {
        message: e.to_string(),
    })?;
    let mut enc = Encoding::new();
    compile_block(&mut enc, &module)?;
    Ok(enc)
}

fn compile_block(enc: &mut Encoding, stmts: &[Stmt]) -> Result<()> {
    enc.write_tag(NodeType::StatementList);
    enc.write_u32(stmts.len() as u32);
    for stmt in stmts {
        compile_stmt(enc, stmt)?;
    }
    Ok(())
}

/// Write a bare statement count + bodies, used for `if`/`for`/`while` bodies
/// which don't need their own `StatementList` wrapper tag (the parent node
/// already identifies where the body starts).
fn compile_body(enc: &mut Encoding, stmts: &[Stmt]) -> Result<()> {
    enc.write_u32(stmts.len() as u32);
    for stmt in stmts {
        compile_stmt(enc, stmt)?;
    }
    Ok(())
}

fn unsupported(what: &str) -> Error {
    Error::Parse {
        message: format!("unsupported construct: {what}"),
    }
}

fn compile_stmt(enc: &mut Encoding, stmt: &Stmt) -> Result<()> {
    match stmt {
        Stmt::Expr(s) => compile_expr(enc, &s.value),
        Stmt::Pass(_) => {
            // No dedicated no-op node; an empty statement list is inert.
            enc.write_tag(NodeType::StatementList);
            enc.write_u32(0);
            Ok(())
        }
        Stmt::Assign(s) => {
            if s.targets.len() != 1 {
                return Err(unsupported("assignment to more than one target"));
            }
            enc.write_tag(NodeType::Assign);
            compile_expr(enc, &s.targets[0])?;
            compile_expr(enc, &s.value)?;
            Ok(())
        }
        Stmt::AugAssign(s) => {
            enc.write_tag(NodeType::AugmentedAssign);
            enc.write_u8(binary_op_kind(&s.op) as u8);
            compile_expr(enc, &s.target)?;
            compile_expr(enc, &s.value)?;
            Ok(())
        }
        Stmt::Return(s) => {
            enc.write_tag(NodeType::Return);
            match &s.value {
                Some(v) => compile_expr(enc, v)?,
                None => compile_none_literal(enc),
            }
            Ok(())
        }
        Stmt::If(s) => {
            if s.orelse.is_empty() {
                enc.write_tag(NodeType::If);
                compile_expr(enc, &s.test)?;
                compile_body(enc, &s.body)?;
            } else {
                enc.write_tag(NodeType::IfElse);
                compile_expr(enc, &s.test)?;
                compile_body(enc, &s.body)?;
                compile_body(enc, &s.orelse)?;
            }
            Ok(())
        }
        Stmt::While(s) => {
            enc.write_tag(NodeType::WhileLoop);
            compile_expr(enc, &s.test)?;
            compile_body(enc, &s.body)?;
            Ok(())
        }
        Stmt::For(s) => {
            if !s.orelse.is_empty() {
                return Err(unsupported("for/else"));
            }
            enc.write_tag(NodeType::ForLoop);
            let names = for_target_names(&s.target)?;
            enc.write_u8(names.len() as u8);
            for name in &names {
                enc.write_string(name);
            }
            compile_expr(enc, &s.iter)?;
            compile_body(enc, &s.body)?;
            Ok(())
        }
        Stmt::Break(_) => {
            enc.write_tag(NodeType::Break);
            Ok(())
        }
        Stmt::Continue(_) => {
            enc.write_tag(NodeType::Continue);
            Ok(())
        }
        Stmt::Import(s) => {
            enc.write_tag(NodeType::Import);
            enc.write_u32(s.names.len() as u32);
            for alias in &s.names {
                compile_alias(enc, alias);
            }
            Ok(())
        }
        Stmt::ImportFrom(s) => {
            enc.write_tag(NodeType::ImportFrom);
            enc.write_string(s.module.as_ref().map(|m| m.as_str()).unwrap_or(""));
            enc.write_u32(s.names.len() as u32);
            for alias in &s.names {
                compile_alias(enc, alias);
            }
            Ok(())
        }
        other => Err(unsupported(&format!("{other:?}"))),
    }
}

fn compile_alias(enc: &mut Encoding, alias: &ast::Alias) {
    enc.write_tag(NodeType::Alias);
    enc.write_string(alias.name.as_str());
    match &alias.asname {
        Some(as_name) => {
            enc.write_u8(1);
            enc.write_string(as_name.as_str());
        }
        None => enc.write_u8(0),
    }
}

fn for_target_names(target: &ast::Expr) -> Result<Vec<String>> {
    match target {
        ast::Expr::Name(n) => Ok(vec![n.id.to_string()]),
        ast::Expr::Tuple(t) if t.elts.len() == 2 => t
            .elts
            .iter()
            .map(|e| match e {
                ast::Expr::Name(n) => Ok(n.id.to_string()),
                _ => Err(unsupported("for-loop target must be a name")),
            })
            .collect(),
        _ => Err(unsupported("for-loop target must be a name or 2-tuple")),
    }
}

fn compile_none_literal(enc: &mut Encoding) {
    enc.write_tag(NodeType::Name);
    enc.write_string("None");
}

fn compile_bool_literal(enc: &mut Encoding, value: bool) {
    enc.write_tag(NodeType::Compare);
    enc.write_tag(NodeType::Integer);
    enc.write_i32(1);
    enc.write_u32(1);
    enc.write_u8(CompareOp::Eq as u8);
    enc.write_tag(NodeType::Integer);
    enc.write_i32(if value { 1 } else { 0 });
}

fn compile_expr(enc: &mut Encoding, expr: &ast::Expr) -> Result<()> {
    match expr {
        ast::Expr::Constant(c) => match &c.value {
            Constant::Int(n) => {
                enc.write_tag(NodeType::Integer);
                let as_i32: i32 = n.to_string().parse().map_err(|_| {
                    unsupported("integer literal out of 32-bit range")
                })?;
                enc.write_i32(as_i32);
                Ok(())
            }
            Constant::Str(s) => {
                enc.write_tag(NodeType::String);
                enc.write_string(s);
                Ok(())
            }
            Constant::Bool(b) => {
                compile_bool_literal(enc, *b);
                Ok(())
            }
            Constant::None => {
                compile_none_literal(enc);
                Ok(())
            }
            other => Err(unsupported(&format!("constant {other:?}"))),
        },
        ast::Expr::Name(n) => {
            enc.write_tag(NodeType::Name);
            enc.write_string(n.id.as_str());
            Ok(())
        }
        ast::Expr::List(l) => {
            enc.write_tag(NodeType::List);
            enc.write_u32(l.elts.len() as u32);
            for e in &l.elts {
                compile_expr(enc, e)?;
            }
            Ok(())
        }
        ast::Expr::Tuple(t) => {
            if t.elts.len() != 2 {
                return Err(unsupported("tuples must have exactly 2 elements"));
            }
            enc.write_tag(NodeType::Tuple);
            compile_expr(enc, &t.elts[0])?;
            compile_expr(enc, &t.elts[1])?;
            Ok(())
        }
        ast::Expr::Dict(d) => {
            enc.write_tag(NodeType::Dictionary);
            enc.write_u32(d.values.len() as u32);
            for (key, value) in d.keys.iter().zip(d.values.iter()) {
                let key = key.as_ref().ok_or_else(|| unsupported("dict unpacking"))?;
                compile_expr(enc, key)?;
                compile_expr(enc, value)?;
            }
            Ok(())
        }
        ast::Expr::BinOp(b) => {
            enc.write_tag(NodeType::BinaryOp);
            enc.write_u8(binary_op_kind(&b.op) as u8);
            compile_expr(enc, &b.left)?;
            compile_expr(enc, &b.right)?;
            Ok(())
        }
        ast::Expr::UnaryOp(u) => {
            enc.write_tag(NodeType::UnaryOp);
            enc.write_u8(unary_op_kind(&u.op) as u8);
            compile_expr(enc, &u.operand)?;
            Ok(())
        }
        ast::Expr::BoolOp(b) => {
            enc.write_tag(NodeType::BoolOp);
            enc.write_u8(match b.op {
                ast::BoolOp::And => BoolOpKind::And as u8,
                ast::BoolOp::Or => BoolOpKind::Or as u8,
            });
            enc.write_u32(b.values.len() as u32);
            for v in &b.values {
                compile_expr(enc, v)?;
            }
            Ok(())
        }
        ast::Expr::Compare(c) => {
            enc.write_tag(NodeType::Compare);
            compile_expr(enc, &c.left)?;
            enc.write_u32(c.ops.len() as u32);
            for (op, comparator) in c.ops.iter().zip(c.comparators.iter()) {
                enc.write_u8(compare_op_kind(op)? as u8);
                compile_expr(enc, comparator)?;
            }
            Ok(())
        }
        ast::Expr::Call(c) => {
            enc.write_tag(NodeType::Call);
            compile_expr(enc, &c.func)?;
            if !c.keywords.is_empty() {
                return Err(unsupported("keyword arguments"));
            }
            enc.write_u32(c.args.len() as u32);
            for a in &c.args {
                compile_expr(enc, a)?;
            }
            Ok(())
        }
        ast::Expr::Attribute(a) => {
            enc.write_tag(NodeType::Attribute);
            compile_expr(enc, &a.value)?;
            enc.write_string(a.attr.as_str());
            Ok(())
        }
        ast::Expr::Subscript(s) => {
            enc.write_tag(NodeType::Subscript);
            compile_expr(enc, &s.value)?;
            enc.write_tag(NodeType::Index);
            compile_expr(enc, &s.slice)?;
            Ok(())
        }
        other => Err(unsupported(&format!("{other:?}"))),
    }
}

fn binary_op_kind(op: &ast::Operator) -> BinaryOpKind {
    use ast::Operator::*;
    match op {
        Add => BinaryOpKind::Add,
        Sub => BinaryOpKind::Sub,
        Mult => BinaryOpKind::Mul,
        Div | FloorDiv => BinaryOpKind::Div,
        Mod => BinaryOpKind::Mod,
        BitAnd => BinaryOpKind::BitAnd,
        BitOr => BinaryOpKind::BitOr,
        BitXor => BinaryOpKind::BitXor,
        LShift => BinaryOpKind::LShift,
        RShift => BinaryOpKind::RShift,
        // Reserved-but-unimplemented at the operator level; encoded as Mul's
        // neighbor and left to fail with `unimplemented-op` at eval time.
        Pow | MatMult => BinaryOpKind::Mul,
    }
}

fn unary_op_kind(op: &ast::UnaryOp) -> UnaryOpKind {
    match op {
        ast::UnaryOp::Not => UnaryOpKind::Not,
        ast::UnaryOp::USub => UnaryOpKind::Neg,
        ast::UnaryOp::UAdd => UnaryOpKind::Pos,
        ast::UnaryOp::Invert => UnaryOpKind::Invert,
    }
}

fn compare_op_kind(op: &ast::CmpOp) -> Result<CompareOp> {
    use ast::CmpOp::*;
    Ok(match op {
        Eq => CompareOp::Eq,
        NotEq => CompareOp::NotEq,
        Lt => CompareOp::Lt,
        LtE => CompareOp::LtE,
        Gt => CompareOp::Gt,
        GtE => CompareOp::GtE,
        In => CompareOp::In,
        NotIn => CompareOp::NotIn,
        Is | IsNot => return Err(unsupported("'is'/'is not'")),
    })
}
