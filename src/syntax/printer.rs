use std::fmt::Write;

use super::expr::{BinaryOp, Expression, UnaryOp};

const INDENT: usize = 4;

/// Renders `expr` pre-order, one node per line, children indented by four
/// spaces below their parent.
pub(crate) fn dump(expr: &Expression) -> String {
    let mut out = String::new();
    write_node(&mut out, expr, 0);
    out
}

fn write_node(out: &mut String, expr: &Expression, indent: usize) {
    // Writing into a `String` cannot fail.
    let _ = match expr {
        Expression::Literal(v) => writeln!(out, "{:indent$}{v}", ""),
        Expression::Id(id) => writeln!(out, "{:indent$}{id}", ""),
        Expression::Binary { op, .. } => writeln!(out, "{:indent$}{}", "", binary_name(*op)),
        Expression::Unary(UnaryOp::Negate, _) => writeln!(out, "{:indent$}Negate", ""),
        Expression::Call { id, .. } => writeln!(out, "{:indent$}Call {id}", ""),
    };

    match expr {
        Expression::Literal(_) | Expression::Id(_) => (),
        Expression::Binary { lhs, rhs, .. } => {
            write_node(out, lhs, indent + INDENT);
            write_node(out, rhs, indent + INDENT);
        }
        Expression::Unary(_, operand) => write_node(out, operand, indent + INDENT),
        Expression::Call { args, .. } => args
            .iter()
            .for_each(|arg| write_node(out, arg, indent + INDENT)),
    }
}

fn binary_name(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Plus => "Plus",
        BinaryOp::Minus => "Minus",
        BinaryOp::Times => "Times",
        BinaryOp::Divide => "Divide",
    }
}
