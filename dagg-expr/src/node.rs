//! Serialized expression trees exchanged between planner and executors.
//!
//! A tree travels as its pre-order node list, each node carrying its type
//! code, payload bytes, child count and distinct flag, encoded with
//! `bitcode`. Payloads of numeric constants and column offsets use the
//! order-preserving big-endian codecs from `dagg-types`.

use bitcode::{Decode, Encode};
use dagg_result::{Error, Result};
use dagg_types::internal::{BeF64, BeI64, BeU64, Codec, EncodeInto};
use dagg_types::DecimalValue;

/// Closed set of node types understood by the aggregation core.
///
/// Codes are part of the wire format and must not be renumbered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ExprType {
    Null,
    Int64,
    Uint64,
    Float64,
    String,
    Bytes,
    MysqlDecimal,
    ColumnRef,
    Count,
    Sum,
    Avg,
    Min,
    Max,
    First,
    GroupConcat,
    AggBitAnd,
    AggBitOr,
    AggBitXor,
}

impl ExprType {
    pub fn code(self) -> i32 {
        match self {
            ExprType::Null => 0,
            ExprType::Int64 => 1,
            ExprType::Uint64 => 2,
            ExprType::Float64 => 4,
            ExprType::String => 5,
            ExprType::Bytes => 6,
            ExprType::MysqlDecimal => 102,
            ExprType::ColumnRef => 201,
            ExprType::Count => 3001,
            ExprType::Sum => 3002,
            ExprType::Avg => 3003,
            ExprType::Min => 3004,
            ExprType::Max => 3005,
            ExprType::First => 3006,
            ExprType::GroupConcat => 3007,
            ExprType::AggBitAnd => 3008,
            ExprType::AggBitOr => 3009,
            ExprType::AggBitXor => 3010,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        let tp = match code {
            0 => ExprType::Null,
            1 => ExprType::Int64,
            2 => ExprType::Uint64,
            4 => ExprType::Float64,
            5 => ExprType::String,
            6 => ExprType::Bytes,
            102 => ExprType::MysqlDecimal,
            201 => ExprType::ColumnRef,
            3001 => ExprType::Count,
            3002 => ExprType::Sum,
            3003 => ExprType::Avg,
            3004 => ExprType::Min,
            3005 => ExprType::Max,
            3006 => ExprType::First,
            3007 => ExprType::GroupConcat,
            3008 => ExprType::AggBitAnd,
            3009 => ExprType::AggBitOr,
            3010 => ExprType::AggBitXor,
            _ => return None,
        };
        Some(tp)
    }

    pub fn is_aggregate(self) -> bool {
        self.code() >= 3001
    }
}

/// One node of an expression tree.
#[derive(Clone, Debug, PartialEq)]
pub struct ExprNode {
    pub tp: ExprType,
    pub val: Vec<u8>,
    pub children: Vec<ExprNode>,
    pub distinct: bool,
}

/// Deepest nesting accepted from the wire; the root sits at depth 0.
pub const MAX_TREE_DEPTH: usize = 256;

#[derive(Encode, Decode)]
struct WireNode {
    tp: i32,
    val: Vec<u8>,
    children: u32,
    distinct: bool,
}

impl ExprNode {
    fn leaf(tp: ExprType, val: Vec<u8>) -> Self {
        Self {
            tp,
            val,
            children: Vec::new(),
            distinct: false,
        }
    }

    /// Reference to input column `offset`.
    pub fn column(offset: i64) -> Self {
        let mut val = Vec::with_capacity(BeI64::WIDTH);
        offset.encode_into(&mut val);
        Self::leaf(ExprType::ColumnRef, val)
    }

    pub fn null() -> Self {
        Self::leaf(ExprType::Null, Vec::new())
    }

    pub fn int64(v: i64) -> Self {
        let mut val = Vec::with_capacity(BeI64::WIDTH);
        v.encode_into(&mut val);
        Self::leaf(ExprType::Int64, val)
    }

    pub fn uint64(v: u64) -> Self {
        let mut val = Vec::with_capacity(BeU64::WIDTH);
        v.encode_into(&mut val);
        Self::leaf(ExprType::Uint64, val)
    }

    pub fn float64(v: f64) -> Self {
        let mut val = Vec::with_capacity(BeF64::WIDTH);
        v.encode_into(&mut val);
        Self::leaf(ExprType::Float64, val)
    }

    pub fn string(v: impl Into<String>) -> Self {
        Self::leaf(ExprType::String, v.into().into_bytes())
    }

    pub fn bytes(v: impl Into<Vec<u8>>) -> Self {
        Self::leaf(ExprType::Bytes, v.into())
    }

    /// Decimal constant, carried as its canonical text.
    pub fn decimal(v: DecimalValue) -> Self {
        Self::leaf(ExprType::MysqlDecimal, v.to_string().into_bytes())
    }

    /// Aggregate call over `args`.
    pub fn aggregate(tp: ExprType, args: Vec<ExprNode>) -> Self {
        Self {
            tp,
            val: Vec::new(),
            children: args,
            distinct: false,
        }
    }

    pub fn with_distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    /// Column offset carried by a `ColumnRef` node.
    pub fn column_offset(&self) -> Result<i64> {
        BeI64::decode(&self.val).map_err(|e| {
            Error::argument_resolution(format!("invalid column reference payload: {e}"))
        })
    }

    pub fn encode_to_vec(&self) -> Vec<u8> {
        let mut flat = Vec::new();
        self.flatten_into(&mut flat);
        bitcode::encode(&flat)
    }

    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self> {
        let flat: Vec<WireNode> = bitcode::decode(bytes).map_err(|e| {
            Error::argument_resolution(format!("malformed expression payload: {e}"))
        })?;
        let mut nodes = flat.into_iter();
        let root = Self::rebuild(&mut nodes, 0)?;
        if nodes.next().is_some() {
            return Err(Error::argument_resolution(
                "trailing nodes after expression tree",
            ));
        }
        Ok(root)
    }

    fn flatten_into(&self, out: &mut Vec<WireNode>) {
        out.push(WireNode {
            tp: self.tp.code(),
            val: self.val.clone(),
            children: self.children.len() as u32,
            distinct: self.distinct,
        });
        for child in &self.children {
            child.flatten_into(out);
        }
    }

    fn rebuild(nodes: &mut impl Iterator<Item = WireNode>, depth: usize) -> Result<Self> {
        if depth > MAX_TREE_DEPTH {
            return Err(Error::argument_resolution(format!(
                "expression tree too deep (limit {MAX_TREE_DEPTH})"
            )));
        }
        let wire = nodes
            .next()
            .ok_or_else(|| Error::argument_resolution("expression tree ended early"))?;
        let tp = ExprType::from_code(wire.tp).ok_or_else(|| {
            Error::UnrecognizedFunction(format!("unknown expression type code {}", wire.tp))
        })?;
        let children = (0..wire.children)
            .map(|_| Self::rebuild(nodes, depth + 1))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            tp,
            val: wire.val,
            children,
            distinct: wire.distinct,
        })
    }
}
