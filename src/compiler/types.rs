//! Default strategies for protobuf scalar kinds.

use crate::schema::{EnumDescriptor, ScalarKind};
use crate::strategy::{self, SizeRange, Strategy};
use crate::value::Value;

/// Length policy for `string` and `bytes` fields.
pub const TEXT_SIZES: SizeRange = SizeRange {
    min_size: 0,
    max_size: 64,
    average_size: 8.0,
};

const I32_RANGE: (i128, i128) = (i32::MIN as i128, i32::MAX as i128);
const I64_RANGE: (i128, i128) = (i64::MIN as i128, i64::MAX as i128);
const U32_RANGE: (i128, i128) = (0, u32::MAX as i128);
const U64_RANGE: (i128, i128) = (0, u64::MAX as i128);

fn ranged<F>(range: (i128, i128), wrap: F) -> Strategy<Value>
where
    F: Fn(i128) -> Value + Send + Sync + 'static,
{
    strategy::integers(range.0, range.1).map(wrap)
}

/// The default strategy for a scalar field kind.
///
/// Integers cover the kind's full range; fixed-width variants share the
/// range of their plain counterpart. Floats cover every bit pattern,
/// NaN and infinities included.
pub fn map_scalar(kind: ScalarKind) -> Strategy<Value> {
    match kind {
        ScalarKind::Double => strategy::floats64().map(Value::F64),
        ScalarKind::Float => strategy::floats32().map(Value::F32),
        ScalarKind::Int32 | ScalarKind::SInt32 | ScalarKind::SFixed32 => ranged(I32_RANGE, |v| Value::I32(v as i32)),
        ScalarKind::Int64 | ScalarKind::SInt64 | ScalarKind::SFixed64 => ranged(I64_RANGE, |v| Value::I64(v as i64)),
        ScalarKind::UInt32 | ScalarKind::Fixed32 => ranged(U32_RANGE, |v| Value::U32(v as u32)),
        ScalarKind::UInt64 | ScalarKind::Fixed64 => ranged(U64_RANGE, |v| Value::U64(v as u64)),
        ScalarKind::Bool => strategy::booleans().map(Value::Bool),
        ScalarKind::String => strategy::text(TEXT_SIZES).map(Value::String),
        ScalarKind::Bytes => strategy::binary(TEXT_SIZES).map(Value::Bytes),
    }
}

/// Uniform choice over an enum's declared numbers.
pub fn map_enum(enumeration: &EnumDescriptor) -> Strategy<Value> {
    strategy::sampled_from(enumeration.numbers()).map(Value::Enum)
}
