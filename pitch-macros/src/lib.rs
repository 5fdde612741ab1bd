//! Proc macros for prompt template inputs.
//!
//! Provides `#[derive(PromptInputs)]` so each prompt template declares its
//! placeholders as the fields of a plain struct instead of a string map.
//!
//! # Example
//!
//! ```ignore
//! /// Inputs for the script prompt
//! #[derive(PromptInputs)]
//! struct ScriptInputs {
//!     title: String,
//!     /// Research text pasted into the prompt
//!     #[prompt(rename = "wikipedia_research")]
//!     research: String,
//! }
//! ```

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, DeriveInput, Field, Lit, Meta, Type};

/// Derive macro implementing `pitch_core::template::PromptInputs`.
///
/// # Attributes
///
/// - `#[prompt(rename = "...")]` on fields - Override the placeholder name (defaults to the field name)
///
/// Every field must be string-like (`String`, `&str`, `Cow<str>`, anything `AsRef<str>`).
/// `Option` fields are rejected: a template placeholder always needs a value.
#[proc_macro_derive(PromptInputs, attributes(prompt))]
pub fn derive_prompt_inputs(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_prompt_inputs(input)
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}

fn expand_prompt_inputs(input: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        syn::Data::Struct(data) => match &data.fields {
            syn::Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "PromptInputs derive only supports structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "PromptInputs derive only supports structs",
            ))
        }
    };

    if fields.is_empty() {
        return Err(syn::Error::new_spanned(
            &input,
            "PromptInputs needs at least one field",
        ));
    }

    let mut names = Vec::new();
    let mut match_arms = Vec::new();

    for field in fields {
        let Some(field_ident) = field.ident.as_ref() else {
            return Err(syn::Error::new_spanned(field, "expected a named field"));
        };
        if is_option_type(&field.ty) {
            return Err(syn::Error::new_spanned(
                &field.ty,
                "PromptInputs fields cannot be Option; every placeholder needs a value",
            ));
        }

        let placeholder = get_placeholder_name(field)?;
        if names.contains(&placeholder) {
            return Err(syn::Error::new_spanned(
                field,
                format!("duplicate placeholder name `{placeholder}`"),
            ));
        }

        match_arms.push(quote! {
            #placeholder => ::core::option::Option::Some(
                ::core::convert::AsRef::<str>::as_ref(&self.#field_ident)
            ),
        });
        names.push(placeholder);
    }

    Ok(quote! {
        impl #impl_generics ::pitch_core::template::PromptInputs for #struct_name #ty_generics #where_clause {
            const NAMES: &'static [&'static str] = &[#(#names),*];

            fn value(&self, name: &str) -> ::core::option::Option<&str> {
                match name {
                    #(#match_arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    })
}

fn get_placeholder_name(field: &Field) -> syn::Result<String> {
    for attr in &field.attrs {
        if attr.path().is_ident("prompt") {
            let meta = attr.parse_args::<Meta>()?;
            match meta {
                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    if let syn::Expr::Lit(expr_lit) = &nv.value {
                        if let Lit::Str(s) = &expr_lit.lit {
                            let name = s.value();
                            if !is_valid_placeholder(&name) {
                                return Err(syn::Error::new_spanned(
                                    s,
                                    "placeholder names may only contain letters, digits and `_`",
                                ));
                            }
                            return Ok(name);
                        }
                    }
                    return Err(syn::Error::new_spanned(nv, "expected `rename = \"...\"`"));
                }
                other => {
                    return Err(syn::Error::new_spanned(
                        other,
                        "unknown prompt attribute, expected `rename = \"...\"`",
                    ))
                }
            }
        }
    }

    let ident = field
        .ident
        .as_ref()
        .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
    Ok(ident.to_string().trim_start_matches("r#").to_string())
}

fn is_valid_placeholder(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_option_type(ty: &Type) -> bool {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            return segment.ident == "Option";
        }
    }
    false
}
