use syn::{Ident, LitStr};

/// Fully qualified enum path as seen from the deriving crate.
pub fn enum_path(ident: &Ident) -> proc_macro2::TokenStream {
    let name = LitStr::new(&ident.to_string(), ident.span());

    quote::quote!(::core::concat!(::core::module_path!(), "::", #name))
}

/// Consistency level variant for a level written in an attribute, in any
/// case (`local_quorum`, `LOCAL_QUORUM`).
pub fn consistency_variant(level: &str) -> Option<&'static str> {
    const LEVELS: [(&str, &str); 11] = [
        ("ANY", "Any"),
        ("ONE", "One"),
        ("TWO", "Two"),
        ("THREE", "Three"),
        ("QUORUM", "Quorum"),
        ("ALL", "All"),
        ("LOCAL_QUORUM", "LocalQuorum"),
        ("EACH_QUORUM", "EachQuorum"),
        ("LOCAL_ONE", "LocalOne"),
        ("SERIAL", "Serial"),
        ("LOCAL_SERIAL", "LocalSerial"),
    ];

    let wanted = level.trim();

    LEVELS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(wanted))
        .map(|(_, variant)| *variant)
}
