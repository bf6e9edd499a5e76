use crate::util::enum_path;
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Fields, parse2};

pub fn derive_field_value(input: TokenStream) -> TokenStream {
    let input = match parse2::<DeriveInput>(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    let name = &input.ident;
    let Data::Enum(data) = &input.data else {
        return Error::new_spanned(name, "FieldValue can only be derived for fieldless enums")
            .to_compile_error();
    };

    if let Some(variant) = data
        .variants
        .iter()
        .find(|v| !matches!(v.fields, Fields::Unit))
    {
        return Error::new_spanned(variant, "FieldValue variants must not carry fields")
            .to_compile_error();
    }

    let path = enum_path(name);
    let idents: Vec<_> = data.variants.iter().map(|v| &v.ident).collect();
    let labels: Vec<_> = idents.iter().map(ToString::to_string).collect();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    quote! {
        impl #impl_generics ::colfam::traits::FieldValue for #name #ty_generics #where_clause {
            fn shape() -> ::colfam::traits::FieldShape {
                ::colfam::traits::FieldShape::enumeration(#path)
            }

            fn to_value(&self) -> ::colfam::value::Value {
                let variant = match self {
                    #( Self::#idents => #labels, )*
                };

                ::colfam::value::Value::Enum(::colfam::value::ValueEnum::new(#path, variant))
            }

            fn from_value(
                value: ::colfam::value::Value,
            ) -> ::core::result::Result<Self, ::colfam::traits::AccessError> {
                let variant = match &value {
                    ::colfam::value::Value::Enum(e) if e.path == #path => e.variant.as_str(),
                    ::colfam::value::Value::Text(text) => text.as_str(),
                    _ => return Err(::colfam::traits::AccessError::wrong_type(#path, &value)),
                };

                match variant {
                    #( #labels => Ok(Self::#idents), )*
                    _ => Err(::colfam::traits::AccessError::WrongType {
                        expected: #path.to_string(),
                        actual: variant.to_string(),
                    }),
                }
            }
        }
    }
}
