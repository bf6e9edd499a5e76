use proc_macro::TokenStream;

mod field_value;
mod record;
mod util;

/// Accessor table and descriptor for a struct with named fields.
///
/// Container options go in `#[record(...)]`, per-field options in
/// `#[column(...)]`.
#[proc_macro_derive(Record, attributes(record, column))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    record::derive_record(input.into()).into()
}

/// `FieldValue` for a fieldless enum stored by variant name.
#[proc_macro_derive(FieldValue)]
pub fn derive_field_value(input: TokenStream) -> TokenStream {
    field_value::derive_field_value(input.into()).into()
}
