//! Registering a custom parameter type through the descriptor builder.
//!
//! Run with: `cargo run --example custom_type -p octothorpe`

use octothorpe::encode::{decode_component, encode_component};
use octothorpe::{HashState, ParamError, TypeDescriptor, Update, Value};

fn main() -> Result<(), ParamError> {
    // Surface the codec's debug events (e.g. ignored unknown names).
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    // A "flag" type: scalar storage restricted to "on"/"off", where "off"
    // counts as empty and therefore disappears from the generated hash.
    TypeDescriptor::new("flag")
        .empty_value(Value::empty_scalar)
        .decode(|raw| {
            let on = decode_component(raw) == "on";
            Value::Scalar(if on { "on".to_string() } else { String::new() })
        })
        .encode(|value| match value.as_scalar() {
            Some("on") => encode_component("on", &[',', '=']),
            _ => String::new(),
        })
        .resolve_with(|old, update| match update {
            Update::None => Ok(old),
            Update::Value(Value::Scalar(s)) if s == "on" || s == "off" || s.is_empty() => {
                Ok(Value::Scalar(if s == "on" { s } else { String::new() }))
            }
            other => Err(ParamError::TypeMismatch {
                tag: "flag".to_string(),
                value: format!("{other:?}"),
            }),
        })
        .resolve_without(|_, _| Value::empty_scalar())
        .register()?;

    let mut state = HashState::new(["q", "dark:flag"])?;
    state.set_hash("#q=rust%20codecs;dark=on");
    println!("parsed:    q = {:?}", state.scalar("q"));
    println!("           dark = {:?}", state.scalar("dark"));
    println!("canonical: {}", state.get_hash());

    let light = state.with("dark", "off")?;
    println!("with off:  {}", light.get_hash());
    println!("original:  {}", state.get_hash());

    Ok(())
}
