//! Dotted member paths such as `A.prototype.foo`.
//!
//! Both the indexer (assignment targets) and the dependency computer
//! (property reads, `new` callees) need the same resolution: follow static
//! member accesses down to a bare identifier and collect the segments.

use crate::oxc::ast::{AssignmentTarget, Expression, IdentifierReference, StaticMemberExpression};

/// A resolved chain of identifier segments with its base identifier.
#[derive(Debug)]
pub(crate) struct MemberPath<'b, 'a> {
    pub base: &'b IdentifierReference<'a>,
    pub segments: Vec<&'b str>,
}

impl MemberPath<'_, '_> {
    pub fn base_name(&self) -> &str {
        self.base.name.as_str()
    }

    pub fn qualified_name(&self) -> String {
        self.segments.join(".")
    }

    /// Position of the first `prototype` segment that follows a type name.
    pub fn prototype_position(&self) -> Option<usize> {
        self.segments
            .iter()
            .position(|segment| *segment == "prototype")
            .filter(|position| *position > 0)
    }
}

/// Resolve `a`, `a.b`, `(a).b.c`. Anything computed yields `None`.
pub(crate) fn expression_path<'b, 'a>(expr: &'b Expression<'a>) -> Option<MemberPath<'b, 'a>> {
    match expr {
        Expression::Identifier(ident) => Some(MemberPath {
            base: ident,
            segments: vec![ident.name.as_str()],
        }),
        Expression::StaticMemberExpression(member) => member_path(member),
        Expression::ParenthesizedExpression(paren) => expression_path(&paren.expression),
        _ => None,
    }
}

pub(crate) fn member_path<'b, 'a>(
    member: &'b StaticMemberExpression<'a>,
) -> Option<MemberPath<'b, 'a>> {
    let mut path = expression_path(&member.object)?;
    path.segments.push(member.property.name.as_str());
    Some(path)
}

/// Resolve the left-hand side of an assignment.
pub(crate) fn assignment_target_path<'b, 'a>(
    target: &'b AssignmentTarget<'a>,
) -> Option<MemberPath<'b, 'a>> {
    match target {
        AssignmentTarget::AssignmentTargetIdentifier(ident) => Some(MemberPath {
            base: ident,
            segments: vec![ident.name.as_str()],
        }),
        AssignmentTarget::StaticMemberExpression(member) => member_path(member),
        _ => None,
    }
}
