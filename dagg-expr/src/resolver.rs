use std::sync::Arc;

use dagg_result::{Error, Result};
use dagg_types::internal::{BeF64, BeI64, BeU64, Codec};
use dagg_types::{Datum, DecimalValue, FieldType, StatementContext};

use crate::expression::{ColumnRef, Constant, ExprRef};
use crate::node::{ExprNode, ExprType};

/// Turns a serialized argument node into an evaluable expression.
pub trait ExprResolver {
    fn resolve(
        &self,
        node: &ExprNode,
        field_types: &[FieldType],
        sc: &StatementContext,
    ) -> Result<ExprRef>;
}

/// Resolves column references and constants, the argument forms a
/// coprocessor receives after the planner has pushed projections down.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultExprResolver;

impl ExprResolver for DefaultExprResolver {
    fn resolve(
        &self,
        node: &ExprNode,
        field_types: &[FieldType],
        _sc: &StatementContext,
    ) -> Result<ExprRef> {
        if !node.children.is_empty() {
            return Err(Error::argument_resolution(format!(
                "{:?} argument cannot have children",
                node.tp
            )));
        }
        match node.tp {
            ExprType::ColumnRef => {
                let offset = node.column_offset()?;
                let index = usize::try_from(offset)
                    .ok()
                    .filter(|idx| *idx < field_types.len())
                    .ok_or_else(|| {
                        Error::argument_resolution(format!(
                            "column offset {offset} out of bounds for {} input fields",
                            field_types.len()
                        ))
                    })?;
                Ok(Arc::new(ColumnRef::new(index, field_types[index])))
            }
            _ => Ok(Arc::new(Constant(constant_value(node)?))),
        }
    }
}

fn constant_value(node: &ExprNode) -> Result<Datum> {
    let bad_payload = |e: &dyn std::fmt::Display| {
        Error::argument_resolution(format!("invalid {:?} payload: {e}", node.tp))
    };
    let datum = match node.tp {
        ExprType::Null => Datum::Null,
        ExprType::Int64 => Datum::Int64(BeI64::decode(&node.val).map_err(|e| bad_payload(&e))?),
        ExprType::Uint64 => {
            Datum::UInt64(BeU64::decode(&node.val).map_err(|e| bad_payload(&e))?)
        }
        ExprType::Float64 => {
            Datum::Float64(BeF64::decode(&node.val).map_err(|e| bad_payload(&e))?)
        }
        ExprType::String => Datum::String(
            String::from_utf8(node.val.clone()).map_err(|e| bad_payload(&e))?,
        ),
        ExprType::Bytes => Datum::Bytes(node.val.clone()),
        ExprType::MysqlDecimal => {
            let text = std::str::from_utf8(&node.val).map_err(|e| bad_payload(&e))?;
            Datum::Decimal(
                text.parse::<DecimalValue>()
                    .map_err(|e| bad_payload(&e))?,
            )
        }
        other => {
            return Err(Error::argument_resolution(format!(
                "unsupported argument expression {other:?}"
            )));
        }
    };
    Ok(datum)
}
