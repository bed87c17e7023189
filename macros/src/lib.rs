//! Derive macros for Rudux
//!
//! This crate provides procedural macros to reduce boilerplate when defining
//! actions.
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Implements `rudux_core::Action` for an enum or struct
//!
//! # Example
//!
//! ```
//! use rudux_core::Action;
//! use rudux_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! #[action(prefix = "todos/")]
//! enum TodoAction {
//!     AddTodo { text: String },
//!     #[action(rename = "toggle")]
//!     ToggleTodo(usize),
//!     ClearCompleted,
//! }
//!
//! assert_eq!(TodoAction::ClearCompleted.action_type(), Some("todos/CLEAR_COMPLETED"));
//! assert_eq!(TodoAction::ToggleTodo(0).action_type(), Some("todos/toggle"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, LitStr, parse_macro_input};

/// Derive macro for actions
///
/// Implements `rudux_core::Action`, returning a fixed `type` string per
/// variant, and adds an `ACTION_TYPES` constant listing every type.
///
/// The type defaults to the variant (or struct) name in
/// `SCREAMING_SNAKE_CASE`: `AddTodo` becomes `"ADD_TODO"`.
///
/// # Attributes
///
/// - `#[action(prefix = "...")]` on the type - prepended to every type
/// - `#[action(rename = "...")]` on a variant or struct - use this type instead
///
/// # Errors
///
/// This macro produces a compile error if:
/// - Applied to a union
/// - An `#[action(...)]` attribute has an unknown key or a non-string value
/// - Two variants end up with the same type
///
/// # Example
///
/// ```
/// use rudux_core::Action;
/// use rudux_macros::Action;
///
/// #[derive(Action, Clone, Debug)]
/// enum CounterAction {
///     Increment,
///     Decrement,
///     #[action(rename = "counter/set")]
///     Set(i64),
/// }
///
/// assert_eq!(CounterAction::Increment.action_type(), Some("INCREMENT"));
/// assert_eq!(CounterAction::Set(3).action_type(), Some("counter/set"));
/// assert_eq!(CounterAction::ACTION_TYPES, &["INCREMENT", "DECREMENT", "counter/set"]);
/// ```
#[proc_macro_derive(Action, attributes(action))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let type_options = parse_options(&input.attrs)?;
    if type_options.rename.is_some() && matches!(input.data, Data::Enum(_)) {
        return Err(syn::Error::new_spanned(
            name,
            "`rename` goes on variants; use `prefix` on the enum",
        ));
    }
    let prefix = type_options.prefix.unwrap_or_default();

    let (arms, types) = match &input.data {
        Data::Enum(data_enum) => {
            let mut arms = Vec::new();
            let mut types: Vec<String> = Vec::new();

            for variant in &data_enum.variants {
                let options = parse_options(&variant.attrs)?;
                if options.prefix.is_some() {
                    return Err(syn::Error::new_spanned(
                        variant,
                        "`prefix` goes on the enum, not on a variant",
                    ));
                }

                let action_type = format!(
                    "{prefix}{}",
                    options
                        .rename
                        .unwrap_or_else(|| screaming_snake_case(&variant.ident.to_string()))
                );
                if types.contains(&action_type) {
                    return Err(syn::Error::new_spanned(
                        variant,
                        format!("duplicate action type \"{action_type}\""),
                    ));
                }

                let ident = &variant.ident;
                let pattern = match &variant.fields {
                    Fields::Named(_) => quote! { Self::#ident { .. } },
                    Fields::Unnamed(_) => quote! { Self::#ident(..) },
                    Fields::Unit => quote! { Self::#ident },
                };
                arms.push(quote! { #pattern => #action_type, });
                types.push(action_type);
            }

            (arms, types)
        },
        Data::Struct(_) => {
            let action_type = format!(
                "{prefix}{}",
                type_options
                    .rename
                    .unwrap_or_else(|| screaming_snake_case(&name.to_string()))
            );
            (vec![quote! { _ => #action_type, }], vec![action_type])
        },
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                name,
                "#[derive(Action)] can only be used on enums and structs",
            ));
        },
    };

    Ok(quote! {
        impl #impl_generics ::rudux_core::Action for #name #ty_generics #where_clause {
            fn action_type(&self) -> ::core::option::Option<&str> {
                ::core::option::Option::Some(match self {
                    #(#arms)*
                })
            }
        }

        impl #impl_generics #name #ty_generics #where_clause {
            /// Every `type` this action can have, in declaration order
            pub const ACTION_TYPES: &'static [&'static str] = &[#(#types),*];
        }
    })
}

#[derive(Default)]
struct ActionOptions {
    prefix: Option<String>,
    rename: Option<String>,
}

fn parse_options(attrs: &[Attribute]) -> syn::Result<ActionOptions> {
    let mut options = ActionOptions::default();

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("action")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("prefix") {
                options.prefix = Some(meta.value()?.parse::<LitStr>()?.value());
                Ok(())
            } else if meta.path.is_ident("rename") {
                options.rename = Some(meta.value()?.parse::<LitStr>()?.value());
                Ok(())
            } else {
                Err(meta.error("expected `prefix` or `rename`"))
            }
        })?;
    }

    Ok(options)
}

/// `AddTodo` → `ADD_TODO`, `HTTPRequest` → `HTTP_REQUEST`
fn screaming_snake_case(ident: &str) -> String {
    let chars: Vec<char> = ident.chars().collect();
    let mut out = String::with_capacity(ident.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower)
            {
                out.push('_');
            }
        }
        out.extend(c.to_uppercase());
    }

    out
}
