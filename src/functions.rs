//! The fixed table of unary math functions.
//!
//! Trigonometric functions take their argument in **radians**; `log` is the
//! base-10 logarithm and `ln` the natural one. The table is a static mapping
//! with no construction step, so it is shared read-only by every evaluation
//! on every thread.

pub type UnaryFn = fn(f64) -> f64;

/// Looks a function up by name. Names are lowercase and matched exactly.
pub fn lookup(name: &str) -> Option<UnaryFn> {
    let f: UnaryFn = match name {
        "sin" => f64::sin,
        "cos" => f64::cos,
        "tan" => f64::tan,
        "sqrt" => f64::sqrt,
        "abs" => f64::abs,
        "log" => f64::log10,
        "ln" => f64::ln,
        "round" => f64::round,
        "floor" => f64::floor,
        "ceil" => f64::ceil,
        "square" => square,
        "cube" => cube,
        "reciprocal" => reciprocal,
        _ => return None,
    };
    Some(f)
}

/// Every name `lookup` accepts, for help text and the CLI hint line.
pub fn names() -> &'static [&'static str] {
    &[
        "sin",
        "cos",
        "tan",
        "sqrt",
        "abs",
        "log",
        "ln",
        "round",
        "floor",
        "ceil",
        "square",
        "cube",
        "reciprocal",
    ]
}

fn square(x: f64) -> f64 {
    x * x
}

fn cube(x: f64) -> f64 {
    x * x * x
}

fn reciprocal(x: f64) -> f64 {
    1.0 / x
}
