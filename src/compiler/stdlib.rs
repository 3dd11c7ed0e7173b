//! Built-in runtime routines.
//!
//! These are provided by the runtime library and are never defined in PINS
//! source. Calls to them resolve to no definition, are typed from the fixed
//! signatures below and receive `0` in place of a static link.

use crate::type_checker::types::Type;

pub const BUILTINS: [&str; 5] = ["print_int", "print_str", "print_log", "rand_int", "seed"];

pub fn is_builtin(name: &str) -> bool {
    BUILTINS.contains(&name)
}

/// Function type of the built-in routine `name`.
pub fn builtin_signature(name: &str) -> Option<Type> {
    let (parameters, return_type) = match name {
        "print_str" => (vec![Type::str()], Type::str()),
        "print_log" => (vec![Type::log()], Type::log()),
        "rand_int" => (vec![Type::int(), Type::int()], Type::int()),
        "print_int" | "seed" => (vec![Type::int()], Type::int()),
        _ => return None,
    };

    Some(Type::Function {
        parameters,
        return_type: Box::new(return_type),
    })
}
