use crate::util::consistency_variant;
use convert_case::{Case, Casing};
use darling::{FromDeriveInput, FromField, ast::Data, util::Ignored};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Data as SynData, DeriveInput, Fields, Generics, Ident, LitStr, Path, Type, parse2};

///
/// RecordArgs
/// `#[record(...)]` on the struct.
///

#[derive(Debug, FromDeriveInput)]
#[darling(attributes(record), supports(struct_named))]
struct RecordArgs {
    ident: Ident,
    generics: Generics,
    data: Data<Ignored, ColumnArgs>,

    #[darling(default)]
    table: Option<String>,
    #[darling(default)]
    keyspace: Option<String>,
    #[darling(default)]
    comment: Option<String>,
    #[darling(default)]
    read: Option<String>,
    #[darling(default)]
    write: Option<String>,
    #[darling(default)]
    insert_strategy: Option<String>,
    #[darling(default)]
    schema_update: Option<bool>,
}

///
/// ColumnArgs
/// `#[column(...)]` on one field.
///

#[derive(Debug, FromField)]
#[darling(attributes(column))]
struct ColumnArgs {
    ident: Option<Ident>,
    ty: Type,

    #[darling(default)]
    id: bool,
    #[darling(default)]
    embedded_id: bool,
    #[darling(default)]
    partition: bool,
    #[darling(default)]
    clustering: bool,
    #[darling(default)]
    name: Option<String>,
    #[darling(default)]
    static_column: bool,
    #[darling(default)]
    index: bool,
    #[darling(default)]
    index_name: Option<String>,
    #[darling(default)]
    order: Option<String>,
    #[darling(default)]
    empty_if_null: bool,
    #[darling(default)]
    read: Option<String>,
    #[darling(default)]
    write: Option<String>,
    #[darling(default)]
    codec: Option<Path>,
    #[darling(default)]
    skip: bool,
}

impl ColumnArgs {
    fn ident(&self) -> darling::Result<&Ident> {
        self.ident
            .as_ref()
            .ok_or_else(|| darling::Error::unsupported_shape("tuple field"))
    }

    fn role(&self, ident: &Ident) -> darling::Result<TokenStream> {
        let flags = [
            (self.id, quote!(Id)),
            (self.embedded_id, quote!(EmbeddedId)),
            (self.partition, quote!(Partition)),
            (self.clustering, quote!(Clustering)),
        ];
        let mut set = flags.into_iter().filter(|(on, _)| *on).map(|(_, role)| role);

        let role = set.next().unwrap_or_else(|| quote!(Column));
        if set.next().is_some() {
            return Err(darling::Error::custom(
                "a field takes at most one of id, embedded_id, partition or clustering",
            )
            .with_span(ident));
        }

        Ok(quote!(::colfam::build::FieldRole::#role))
    }
}

pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = match parse2::<DeriveInput>(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    if !matches!(&input.data, SynData::Struct(data) if matches!(data.fields, Fields::Named(_))) {
        return syn::Error::new_spanned(
            &input.ident,
            "Record can only be derived for structs with named fields",
        )
        .to_compile_error();
    }

    let args = match RecordArgs::from_derive_input(&input) {
        Ok(args) => args,
        Err(err) => return err.write_errors(),
    };

    expand(&args).unwrap_or_else(darling::Error::write_errors)
}

fn expand(args: &RecordArgs) -> darling::Result<TokenStream> {
    let fields = args
        .data
        .as_ref()
        .take_struct()
        .ok_or_else(|| darling::Error::unsupported_shape("enum"))?
        .fields
        .into_iter()
        .filter(|f| !f.skip)
        .collect::<Vec<_>>();

    let accessors = accessors(args, &fields)?;
    let record = record_impl(args, &fields)?;

    Ok(quote! {
        #accessors
        #record
    })
}

// DynRecord: one match arm per stored field, keyed by its Rust name.
fn accessors(args: &RecordArgs, fields: &[&ColumnArgs]) -> darling::Result<TokenStream> {
    let name = &args.ident;
    let (impl_generics, ty_generics, where_clause) = args.generics.split_for_impl();

    let mut value_fields = Vec::new();
    let mut key_fields = Vec::new();
    for field in fields {
        let ident = field.ident()?;
        if field.embedded_id {
            key_fields.push(ident);
        } else {
            value_fields.push(ident);
        }
    }

    let value_names: Vec<_> = value_fields.iter().map(|i| lit(i)).collect();
    let key_names: Vec<_> = key_fields.iter().map(|i| lit(i)).collect();

    let key_accessors = if key_fields.is_empty() {
        quote!()
    } else {
        quote! {
            fn get_key(
                &self,
                field: &str,
            ) -> ::core::result::Result<&dyn ::colfam::traits::DynRecord, ::colfam::traits::AccessError> {
                match field {
                    #( #key_names => Ok(&self.#key_fields), )*
                    _ => Err(::colfam::traits::AccessError::not_a_key_field(
                        <Self as ::colfam::traits::Record>::TYPE_NAME,
                        field,
                    )),
                }
            }

            fn set_key(
                &mut self,
                field: &str,
                key: ::std::boxed::Box<dyn ::colfam::traits::DynRecord>,
            ) -> ::core::result::Result<(), ::colfam::traits::AccessError> {
                match field {
                    #( #key_names => {
                        self.#key_fields = ::colfam::traits::downcast_key(key)?;
                        Ok(())
                    } )*
                    _ => Err(::colfam::traits::AccessError::not_a_key_field(
                        <Self as ::colfam::traits::Record>::TYPE_NAME,
                        field,
                    )),
                }
            }
        }
    };

    Ok(quote! {
        impl #impl_generics ::colfam::traits::DynRecord for #name #ty_generics #where_clause {
            fn type_name(&self) -> &'static str {
                <Self as ::colfam::traits::Record>::TYPE_NAME
            }

            fn get_field(
                &self,
                field: &str,
            ) -> ::core::result::Result<::colfam::value::Value, ::colfam::traits::AccessError> {
                let type_name = <Self as ::colfam::traits::Record>::TYPE_NAME;

                match field {
                    #( #value_names => Ok(::colfam::traits::FieldValue::to_value(&self.#value_fields)), )*
                    #( #key_names => Err(::colfam::traits::AccessError::embedded_key(type_name, field)), )*
                    _ => Err(::colfam::traits::AccessError::unknown_field(type_name, field)),
                }
            }

            fn set_field(
                &mut self,
                field: &str,
                value: ::colfam::value::Value,
            ) -> ::core::result::Result<(), ::colfam::traits::AccessError> {
                let type_name = <Self as ::colfam::traits::Record>::TYPE_NAME;

                match field {
                    #( #value_names => {
                        self.#value_fields = ::colfam::traits::FieldValue::from_value(value)
                            .map_err(|err| ::colfam::traits::AccessError::field(type_name, field, err))?;
                        Ok(())
                    } )*
                    #( #key_names => Err(::colfam::traits::AccessError::embedded_key(type_name, field)), )*
                    _ => Err(::colfam::traits::AccessError::unknown_field(type_name, field)),
                }
            }

            #key_accessors

            fn clone_record(&self) -> ::std::boxed::Box<dyn ::colfam::traits::DynRecord> {
                ::std::boxed::Box::new(::core::clone::Clone::clone(self))
            }

            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::core::any::Any {
                self
            }

            fn into_any(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn ::core::any::Any> {
                self
            }
        }
    })
}

fn record_impl(args: &RecordArgs, fields: &[&ColumnArgs]) -> darling::Result<TokenStream> {
    let name = &args.ident;
    let (impl_generics, ty_generics, where_clause) = args.generics.split_for_impl();
    let type_name = lit(name);

    let table = args
        .table
        .clone()
        .unwrap_or_else(|| name.to_string().to_case(Case::Snake));

    let mut options = vec![quote!(.table(#table))];
    if let Some(keyspace) = &args.keyspace {
        options.push(quote!(.keyspace(#keyspace)));
    }
    if let Some(comment) = &args.comment {
        options.push(quote!(.comment(#comment)));
    }
    if let Some(level) = &args.read {
        let level = consistency(level, name)?;
        options.push(quote!(.read(#level)));
    }
    if let Some(level) = &args.write {
        let level = consistency(level, name)?;
        options.push(quote!(.write(#level)));
    }
    if let Some(strategy) = &args.insert_strategy {
        let variant = match strategy.to_case(Case::Snake).as_str() {
            "all_fields" => quote!(AllFields),
            "not_null_fields" => quote!(NotNullFields),
            _ => {
                return Err(darling::Error::custom(format!(
                    "unknown insert strategy '{strategy}', expected all_fields or not_null_fields"
                ))
                .with_span(name));
            }
        };
        options.push(quote!(.insert_strategy(::colfam::model::InsertStrategy::#variant)));
    }
    if let Some(enabled) = args.schema_update {
        options.push(quote!(.schema_update(#enabled)));
    }

    let mut errors = darling::Error::accumulator();
    let descriptors: Vec<_> = fields
        .iter()
        .filter_map(|field| errors.handle(field_descriptor(field)))
        .collect();
    errors.finish()?;

    Ok(quote! {
        impl #impl_generics ::colfam::traits::Record for #name #ty_generics #where_clause {
            const TYPE_NAME: &'static str = #type_name;

            fn descriptor() -> ::colfam::build::RecordDescriptor {
                ::colfam::build::RecordDescriptor::of::<Self>()
                    #( #options )*
                    #( .field(#descriptors) )*
            }
        }
    })
}

fn field_descriptor(field: &ColumnArgs) -> darling::Result<TokenStream> {
    let ident = field.ident()?;
    let field_name = lit(ident);
    let ty = &field.ty;
    let role = field.role(ident)?;

    let base = if field.embedded_id {
        quote!(::colfam::build::FieldDescriptor::embedded_id::<#ty>(#field_name))
    } else {
        quote! {
            ::colfam::build::FieldDescriptor::new(
                #field_name,
                #role,
                <#ty as ::colfam::traits::FieldValue>::shape(),
            )
        }
    };

    let mut options = Vec::new();
    if let Some(column) = &field.name {
        options.push(quote!(.column_name(#column)));
    }
    if field.static_column {
        options.push(quote!(.static_column()));
    }
    if field.index || field.index_name.is_some() {
        let name = field
            .index_name
            .as_ref()
            .map_or_else(|| quote!(None), |n| quote!(Some(#n)));
        options.push(quote!(.index(#name)));
    }
    if let Some(order) = &field.order {
        let variant = match order.to_ascii_lowercase().as_str() {
            "asc" => quote!(Asc),
            "desc" => quote!(Desc),
            _ => {
                return Err(darling::Error::custom(format!(
                    "unknown clustering order '{order}', expected asc or desc"
                ))
                .with_span(ident));
            }
        };
        options.push(quote!(.order(::colfam::model::ClusteringOrder::#variant)));
    }
    if field.empty_if_null {
        options.push(quote!(.empty_if_null()));
    }
    if let Some(level) = &field.read {
        let level = consistency(level, ident)?;
        options.push(quote!(.read(#level)));
    }
    if let Some(level) = &field.write {
        let level = consistency(level, ident)?;
        options.push(quote!(.write(#level)));
    }
    if let Some(codec) = &field.codec {
        options.push(quote!(.codec(#codec)));
    }

    Ok(quote!(#base #( #options )*))
}

fn consistency(level: &str, span: &Ident) -> darling::Result<TokenStream> {
    let variant = consistency_variant(level).ok_or_else(|| {
        darling::Error::custom(format!("unknown consistency level '{level}'")).with_span(span)
    })?;
    let variant = format_ident!("{variant}");

    Ok(quote!(::colfam::model::ConsistencyLevel::#variant))
}

fn lit(ident: &Ident) -> LitStr {
    LitStr::new(&ident.to_string(), ident.span())
}
