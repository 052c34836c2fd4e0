//! Names of the engine's builtin functions and types.
//!
//! Token operands index straight into these tables, so the order must
//! match the engine's.

use num_traits::FromPrimitive;

use crate::VariantKind;

/// Builtin functions, indexed by the operand of a builtin-function token.
pub static FUNCTIONS: [&str; 91] = [
    "sin", "cos", "tan", "sinh", "cosh", "tanh",
    "asin", "acos", "atan", "atan2", "sqrt", "fmod",
    "fposmod", "posmod", "floor", "ceil", "round", "abs",
    "sign", "pow", "log", "exp", "is_nan", "is_inf",
    "is_equal_approx", "is_zero_approx", "ease", "decimals", "step_decimals", "stepify",
    "lerp", "lerp_angle", "inverse_lerp", "range_lerp", "smoothstep", "move_toward",
    "dectime", "randomize", "randi", "randf", "rand_range", "seed",
    "rand_seed", "deg2rad", "rad2deg", "linear2db", "db2linear", "polar2cartesian",
    "cartesian2polar", "wrapi", "wrapf", "max", "min", "clamp",
    "nearest_po2", "weakref", "funcref", "convert", "typeof", "type_exists",
    "char", "ord", "str", "print", "printt", "prints",
    "printerr", "printraw", "print_debug", "push_error", "push_warning", "var2str",
    "str2var", "var2bytes", "bytes2var", "range", "load", "inst2dict",
    "dict2inst", "validate_json", "parse_json", "to_json", "hash", "Color8",
    "ColorN", "print_stack", "get_stack", "instance_from_id", "len", "is_instance_valid",
    "deep_equal",
];

pub fn function_name(index: u32) -> Option<&'static str> {
    FUNCTIONS.get(index as usize).copied()
}

/// Builtin types are indexed by their variant kind.
pub const TYPE_COUNT: usize = 27;

/// Look up the builtin type named by a builtin-type token operand.
pub fn type_name(index: u32) -> Option<&'static str> {
    VariantKind::from_u32(index)?.type_name()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_lookup() {
        assert_eq!(function_name(0), Some("sin"));
        assert_eq!(function_name(63), Some("print"));
        assert_eq!(function_name(90), Some("deep_equal"));
        assert_eq!(function_name(91), None);
    }

    #[test]
    fn type_lookup() {
        assert_eq!(type_name(2), Some("int"));
        assert_eq!(type_name(3), Some("float"));
        assert_eq!(type_name(11), Some("AABB"));
        assert_eq!(type_name(0), None);
        assert_eq!(type_name(27), None);
    }
}
