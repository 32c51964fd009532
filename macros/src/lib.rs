//! Derive macros for the Taskbook architecture
//!
//! This crate provides procedural macros to reduce boilerplate when
//! building unidirectional-data-flow systems with Taskbook.
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Generates helpers for action enums (commands/events)
//!
//! # Example
//!
//! ```ignore
//! use taskbook_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! enum TodoAction {
//!     #[command]
//!     Add { text: String },
//!
//!     #[event]
//!     Hydrated { tasks: Vec<Task> },
//! }
//!
//! // Generated methods:
//! assert!(TodoAction::Add { text: "test".into() }.is_command());
//! assert!(TodoAction::Hydrated { tasks: vec![] }.is_event());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, parse_macro_input};

/// Derive macro for Action enums
///
/// Generates helper methods for action enums:
/// - `is_command()` - Returns true if this variant is a command
/// - `is_event()` - Returns true if this variant is an event
/// - `event_type()` - Returns the event type name for diagnostics
///
/// # Attributes
///
/// - `#[command]` - Mark a variant as a command (user intent, validated
///   by the reducer)
/// - `#[event]` - Mark a variant as an event (a fact, applied directly)
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if:
/// - Applied to a non-enum type
/// - A variant has both `#[command]` and `#[event]` attributes
#[proc_macro_derive(Action, attributes(command, event))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(input, "#[derive(Action)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    // Collect variants marked as commands or events
    let mut command_variants = Vec::new();
    let mut event_variants = Vec::new();

    for variant in &data_enum.variants {
        let is_command = has_attribute(&variant.attrs, "command");
        let is_event = has_attribute(&variant.attrs, "event");

        if is_command && is_event {
            return syn::Error::new_spanned(
                variant,
                "Variant cannot be both #[command] and #[event]",
            )
            .to_compile_error()
            .into();
        }

        if is_command {
            command_variants.push((&variant.ident, &variant.fields));
        }

        if is_event {
            event_variants.push((&variant.ident, &variant.fields));
        }
    }

    // Generate is_command() match arms
    let is_command_arms = command_variants
        .iter()
        .map(|&(variant, fields)| variant_arm(variant, fields, quote! { true }));

    // Generate is_event() match arms
    let is_event_arms = event_variants
        .iter()
        .map(|&(variant, fields)| variant_arm(variant, fields, quote! { true }));

    // Generate event_type() match arms for events only
    let event_type_arms = event_variants.iter().map(|&(variant, fields)| {
        let type_name = format!("{variant}.v1");
        variant_arm(variant, fields, quote! { #type_name })
    });

    let expanded = quote! {
        impl #name {
            /// Returns true if this action is a command
            #[must_use]
            pub const fn is_command(&self) -> bool {
                match self {
                    #(#is_command_arms)*
                    _ => false,
                }
            }

            /// Returns true if this action is an event
            #[must_use]
            pub const fn is_event(&self) -> bool {
                match self {
                    #(#is_event_arms)*
                    _ => false,
                }
            }

            /// Returns the event type name for diagnostics
            ///
            /// Only events have type names. Commands return "unknown".
            #[must_use]
            pub const fn event_type(&self) -> &'static str {
                match self {
                    #(#event_type_arms)*
                    _ => "unknown",
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Build one match arm `Self::Variant { .. } => <body>,` respecting the
/// variant's field shape
fn variant_arm(
    variant: &syn::Ident,
    fields: &Fields,
    body: proc_macro2::TokenStream,
) -> proc_macro2::TokenStream {
    match fields {
        Fields::Named(_) => quote! { Self::#variant { .. } => #body, },
        Fields::Unnamed(_) => quote! { Self::#variant(..) => #body, },
        Fields::Unit => quote! { Self::#variant => #body, },
    }
}

/// Helper function to check if an attribute list contains a specific attribute
fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}
