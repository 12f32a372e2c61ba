use std::fmt;

use dagg_expr::{ExprRef, ExprType};

/// The closed set of aggregate function kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AggFuncKind {
    Sum,
    Count,
    Avg,
    GroupConcat,
    Max,
    Min,
    FirstRow,
    BitOr,
    BitXor,
    BitAnd,
}

impl AggFuncKind {
    pub fn name(self) -> &'static str {
        match self {
            AggFuncKind::Sum => "sum",
            AggFuncKind::Count => "count",
            AggFuncKind::Avg => "avg",
            AggFuncKind::GroupConcat => "group_concat",
            AggFuncKind::Max => "max",
            AggFuncKind::Min => "min",
            AggFuncKind::FirstRow => "firstrow",
            AggFuncKind::BitOr => "bit_or",
            AggFuncKind::BitXor => "bit_xor",
            AggFuncKind::BitAnd => "bit_and",
        }
    }

    /// Map a wire node type onto a function kind; `None` for non-aggregates.
    pub fn from_expr_type(tp: ExprType) -> Option<Self> {
        let kind = match tp {
            ExprType::Sum => AggFuncKind::Sum,
            ExprType::Count => AggFuncKind::Count,
            ExprType::Avg => AggFuncKind::Avg,
            ExprType::GroupConcat => AggFuncKind::GroupConcat,
            ExprType::Max => AggFuncKind::Max,
            ExprType::Min => AggFuncKind::Min,
            ExprType::First => AggFuncKind::FirstRow,
            ExprType::AggBitOr => AggFuncKind::BitOr,
            ExprType::AggBitXor => AggFuncKind::BitXor,
            ExprType::AggBitAnd => AggFuncKind::BitAnd,
            _ => return None,
        };
        Some(kind)
    }

    pub fn expr_type(self) -> ExprType {
        match self {
            AggFuncKind::Sum => ExprType::Sum,
            AggFuncKind::Count => ExprType::Count,
            AggFuncKind::Avg => ExprType::Avg,
            AggFuncKind::GroupConcat => ExprType::GroupConcat,
            AggFuncKind::Max => ExprType::Max,
            AggFuncKind::Min => ExprType::Min,
            AggFuncKind::FirstRow => ExprType::First,
            AggFuncKind::BitOr => ExprType::AggBitOr,
            AggFuncKind::BitXor => ExprType::AggBitXor,
            AggFuncKind::BitAnd => ExprType::AggBitAnd,
        }
    }

    /// DISTINCT changes the answer only for these kinds.
    pub fn supports_distinct(self) -> bool {
        matches!(
            self,
            AggFuncKind::Sum | AggFuncKind::Count | AggFuncKind::Avg | AggFuncKind::GroupConcat
        )
    }
}

impl fmt::Display for AggFuncKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which stage an aggregate function runs in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AggFunctionMode {
    /// Consumes raw input rows.
    #[default]
    Complete,
    /// Consumes partial results emitted by upstream stages.
    Final,
}

/// Immutable description of one aggregate call.
///
/// Built once per query and shared by every function instance and group
/// context derived from it.
#[derive(Clone, Debug)]
pub struct AggregateDescriptor {
    pub kind: AggFuncKind,
    pub args: Vec<ExprRef>,
    pub has_distinct: bool,
}

impl AggregateDescriptor {
    pub fn new(kind: AggFuncKind, args: Vec<ExprRef>, has_distinct: bool) -> Self {
        Self {
            kind,
            args,
            has_distinct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_wire_types() {
        for kind in [
            AggFuncKind::Sum,
            AggFuncKind::Count,
            AggFuncKind::Avg,
            AggFuncKind::GroupConcat,
            AggFuncKind::Max,
            AggFuncKind::Min,
            AggFuncKind::FirstRow,
            AggFuncKind::BitOr,
            AggFuncKind::BitXor,
            AggFuncKind::BitAnd,
        ] {
            assert_eq!(AggFuncKind::from_expr_type(kind.expr_type()), Some(kind));
        }
        assert_eq!(AggFuncKind::from_expr_type(ExprType::ColumnRef), None);
        assert!(AggFuncKind::Count.supports_distinct());
        assert!(!AggFuncKind::Max.supports_distinct());
        assert_eq!(AggFuncKind::FirstRow.to_string(), "firstrow");
    }
}
