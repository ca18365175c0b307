//! XPath 1.0 Functions
//!
//! Node Set Functions:
//! - position(), last(), count(), local-name(), namespace-uri(), name()
//!
//! String Functions:
//! - string(), concat(), starts-with(), ends-with(), contains(), substring(),
//!   substring-before(), substring-after(), string-length(),
//!   normalize-space(), translate()
//!
//! Boolean Functions:
//! - boolean(), not(), true(), false(), lang()
//!
//! Number Functions:
//! - number(), sum(), floor(), ceiling(), round()
//!
//! Arity is checked once at compile time against [`SIGNATURES`].

use super::axes;
use super::eval::EvalContext;
use super::parser::Axis;
use super::value::{parse_number, XPathValue};
use crate::error::{Error, Result};
use crate::navigator::{string_value, Navigator, NodeType};

/// Name, minimum and maximum argument count, and the arity message
pub type Signature = (&'static str, usize, Option<usize>, &'static str);

const NONE: &str = "no arguments";
const ONE: &str = "exactly 1 argument";
const TWO: &str = "exactly 2 arguments";
const OPTIONAL: &str = "0 or 1 arguments";

pub const SIGNATURES: &[Signature] = &[
    ("last", 0, Some(0), NONE),
    ("position", 0, Some(0), NONE),
    ("count", 1, Some(1), ONE),
    ("local-name", 0, Some(1), OPTIONAL),
    ("namespace-uri", 0, Some(1), OPTIONAL),
    ("name", 0, Some(1), OPTIONAL),
    ("string", 0, Some(1), OPTIONAL),
    ("concat", 2, None, "at least 2 arguments"),
    ("starts-with", 2, Some(2), TWO),
    ("ends-with", 2, Some(2), TWO),
    ("contains", 2, Some(2), TWO),
    ("substring", 2, Some(3), "2 or 3 arguments"),
    ("substring-before", 2, Some(2), TWO),
    ("substring-after", 2, Some(2), TWO),
    ("string-length", 0, Some(1), OPTIONAL),
    ("normalize-space", 0, Some(1), OPTIONAL),
    ("translate", 3, Some(3), "exactly 3 arguments"),
    ("boolean", 1, Some(1), ONE),
    ("not", 1, Some(1), ONE),
    ("true", 0, Some(0), NONE),
    ("false", 0, Some(0), NONE),
    ("lang", 1, Some(1), ONE),
    ("number", 0, Some(1), OPTIONAL),
    ("sum", 1, Some(1), ONE),
    ("floor", 1, Some(1), ONE),
    ("ceiling", 1, Some(1), ONE),
    ("round", 1, Some(1), ONE),
];

/// Validate a call site: known function, acceptable argument count.
pub fn check(name: &str, argc: usize) -> Result<()> {
    if name == "id" {
        return Err(Error::Unsupported("id()".to_string()));
    }
    let &(function, min, max, expected) = SIGNATURES
        .iter()
        .find(|sig| sig.0 == name)
        .ok_or_else(|| Error::UnknownFunction(name.to_string()))?;
    if argc < min || max.is_some_and(|max| argc > max) {
        return Err(Error::Arity { function, expected });
    }
    Ok(())
}

/// Evaluate a function call
pub fn call<N: Navigator>(
    name: &str,
    args: Vec<XPathValue<N>>,
    ctx: &EvalContext<N>,
) -> Result<XPathValue<N>> {
    check(name, args.len())?;
    let value = match name {
        // Node Set Functions
        "position" => XPathValue::Number(ctx.position as f64),
        "last" => XPathValue::Number(ctx.size as f64),
        "count" => XPathValue::Number(nodeset("count", &args[0])?.len() as f64),
        "local-name" => XPathValue::String(
            subject("local-name", &args, ctx)?
                .filter(|n| n.node_type() != NodeType::Root)
                .map(|n| n.local_name().to_string())
                .unwrap_or_default(),
        ),
        "namespace-uri" => XPathValue::String(
            subject("namespace-uri", &args, ctx)?
                .map(|n| n.namespace_uri().to_string())
                .unwrap_or_default(),
        ),
        "name" => XPathValue::String(
            subject("name", &args, ctx)?
                .filter(|n| n.node_type() != NodeType::Root)
                .map(|n| n.name())
                .unwrap_or_default(),
        ),

        // String Functions
        "string" => XPathValue::String(string_arg(&args, ctx)),
        "concat" => XPathValue::String(args.iter().map(XPathValue::to_string_value).collect()),
        "starts-with" => {
            let (s, prefix) = two_strings(&args);
            XPathValue::Boolean(s.starts_with(&prefix))
        }
        "ends-with" => {
            let (s, suffix) = two_strings(&args);
            XPathValue::Boolean(s.ends_with(&suffix))
        }
        "contains" => {
            let (s, pattern) = two_strings(&args);
            XPathValue::Boolean(s.contains(&pattern))
        }
        "substring" => fn_substring(&args),
        "substring-before" => {
            let (s, pattern) = two_strings(&args);
            let before = s.find(&pattern).map(|pos| &s[..pos]).unwrap_or("");
            XPathValue::String(before.to_string())
        }
        "substring-after" => {
            let (s, pattern) = two_strings(&args);
            let after = s.find(&pattern).map(|pos| &s[pos + pattern.len()..]).unwrap_or("");
            XPathValue::String(after.to_string())
        }
        "string-length" => XPathValue::Number(string_arg(&args, ctx).chars().count() as f64),
        "normalize-space" => XPathValue::String(
            string_arg(&args, ctx)
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" "),
        ),
        "translate" => fn_translate(&args),

        // Boolean Functions
        "boolean" => XPathValue::Boolean(args[0].to_boolean()),
        "not" => XPathValue::Boolean(!args[0].to_boolean()),
        "true" => XPathValue::Boolean(true),
        "false" => XPathValue::Boolean(false),
        "lang" => XPathValue::Boolean(fn_lang(&args[0].to_string_value(), &ctx.node)),

        // Number Functions
        "number" => XPathValue::Number(match args.first() {
            Some(arg) => arg.to_number(),
            None => parse_number(&string_value(&ctx.node)),
        }),
        "sum" => XPathValue::Number(
            nodeset("sum", &args[0])?
                .iter()
                .map(|n| parse_number(&string_value(n)))
                .sum(),
        ),
        "floor" => XPathValue::Number(args[0].to_number().floor()),
        "ceiling" => XPathValue::Number(args[0].to_number().ceil()),
        "round" => XPathValue::Number(round(args[0].to_number())),

        _ => return Err(Error::UnknownFunction(name.to_string())),
    };
    Ok(value)
}

fn nodeset<'v, N: Navigator>(function: &'static str, arg: &'v XPathValue<N>) -> Result<&'v [N]> {
    arg.as_nodeset()
        .map(Vec::as_slice)
        .ok_or(Error::ArgumentType {
            function,
            expected: "a node-set",
        })
}

/// The optional node-set argument's first node, or the context node
fn subject<'v, N: Navigator>(
    function: &'static str,
    args: &'v [XPathValue<N>],
    ctx: &'v EvalContext<N>,
) -> Result<Option<&'v N>> {
    match args.first() {
        Some(arg) => Ok(nodeset(function, arg)?.first()),
        None => Ok(Some(&ctx.node)),
    }
}

fn string_arg<N: Navigator>(args: &[XPathValue<N>], ctx: &EvalContext<N>) -> String {
    match args.first() {
        Some(arg) => arg.to_string_value(),
        None => string_value(&ctx.node),
    }
}

fn two_strings<N: Navigator>(args: &[XPathValue<N>]) -> (String, String) {
    (args[0].to_string_value(), args[1].to_string_value())
}

/// XPath round(): halves go towards positive infinity, and values in
/// [-0.5, 0) give negative zero.
fn round(n: f64) -> f64 {
    let nearest = n.round();
    if (nearest - n).abs() == 0.5 {
        n.ceil()
    } else {
        nearest
    }
}

/// Characters at 1-based positions p with round(start) <= p < round(start) + round(len).
/// NaN bounds select nothing.
fn fn_substring<N: Navigator>(args: &[XPathValue<N>]) -> XPathValue<N> {
    let s = args[0].to_string_value();
    let start = round(args[1].to_number());
    let end = match args.get(2) {
        Some(len) => start + round(len.to_number()),
        None => f64::INFINITY,
    };
    let result = s
        .chars()
        .enumerate()
        .filter(|(i, _)| {
            let p = (*i + 1) as f64;
            p >= start && p < end
        })
        .map(|(_, c)| c)
        .collect();
    XPathValue::String(result)
}

fn fn_translate<N: Navigator>(args: &[XPathValue<N>]) -> XPathValue<N> {
    let s = args[0].to_string_value();
    let from: Vec<char> = args[1].to_string_value().chars().collect();
    let to: Vec<char> = args[2].to_string_value().chars().collect();

    let result = s
        .chars()
        .filter_map(|c| match from.iter().position(|&fc| fc == c) {
            Some(pos) => to.get(pos).copied(),
            None => Some(c),
        })
        .collect();
    XPathValue::String(result)
}

/// lang(): the nearest `lang` leaf or key on the context node or an
/// ancestor decides; subtags match their primary tag.
fn fn_lang<N: Navigator>(target: &str, node: &N) -> bool {
    let target = target.to_lowercase();
    let mut cursor = node.copy();
    loop {
        let declared = axes::navigate(&cursor, Axis::Child)
            .into_iter()
            .chain(axes::navigate(&cursor, Axis::Attribute))
            .find(|n| n.local_name() == "lang")
            .and_then(|n| n.value());
        if let Some(lang) = declared {
            let lang = lang.to_lowercase();
            return lang == target
                || (lang.starts_with(&target) && lang.as_bytes().get(target.len()) == Some(&b'-'));
        }
        if !cursor.move_to_parent() {
            return false;
        }
    }
}
