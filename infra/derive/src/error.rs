use fxhash::FxHashSet;
use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident, quote};
use syn::{Attribute, Data, DeriveInput, Field, Fields, Ident, Type, Variant};

const CONTEXT_FIELD: &str = "context";
const INTERNAL_VARIANT: &str = "Internal";

/// What the macro needs to know about one enum variant.
struct ErrorVariant<'a> {
    ident: &'a Ident,
    source: Option<(&'a Ident, &'a Type)>,
    has_context: bool,
    has_message: bool,
    cfg_attrs: Vec<&'a Attribute>,
}

impl<'a> ErrorVariant<'a> {
    fn parse(variant: &'a Variant) -> syn::Result<Self> {
        let Fields::Named(fields) = &variant.fields else {
            return Err(syn::Error::new_spanned(
                variant,
                "census_error variants must use named fields",
            ));
        };

        let mut context = None;
        let mut source = None;
        let mut has_message = false;

        for field in &fields.named {
            let Some(ident) = field.ident.as_ref() else { continue };
            if ident == CONTEXT_FIELD {
                if !is_optional_cow(&field.ty) {
                    return Err(syn::Error::new_spanned(
                        &field.ty,
                        "`context` must be `Option<Cow<'static, str>>`",
                    ));
                }
                context = Some(field);
            } else if is_source_field(field) {
                source = Some((ident, &field.ty));
            } else if ident == "message" {
                has_message = true;
            }
        }

        if source.is_some() {
            if context.is_none() {
                return Err(syn::Error::new_spanned(
                    &variant.ident,
                    "census_error variants with a source need `context: Option<Cow<'static, str>>`",
                ));
            }
            if fields.named.len() != 2 {
                return Err(syn::Error::new_spanned(
                    &variant.ident,
                    "census_error variants with a source may only carry `source` and `context`",
                ));
            }
        }

        Ok(Self {
            ident: &variant.ident,
            source,
            has_context: context.is_some(),
            has_message,
            cfg_attrs: variant.attrs.iter().filter(|a| a.path().is_ident("cfg")).collect(),
        })
    }

    fn is_internal(&self) -> bool {
        self.ident == INTERNAL_VARIANT
    }
}

pub(crate) fn expand(input: DeriveInput) -> TokenStream {
    match try_expand(&input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

fn try_expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let name = &input.ident;
    let ext = format_ident!("{}Ext", name);

    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(name, "census_error can only be applied to enums"));
    };

    let variants =
        data.variants.iter().map(ErrorVariant::parse).collect::<syn::Result<Vec<_>>>()?;
    ensure_unique_sources(&variants)?;

    let derives = missing_derives(input);
    let context_trait = context_trait(name, &ext, &variants);
    let source_impls = variants.iter().filter_map(|v| source_impls(name, &ext, v));
    let internal_impls = variants
        .iter()
        .find(|v| v.is_internal() && v.has_message && v.has_context)
        .map(|v| internal_impls(name, v));

    Ok(quote! {
        #[allow(non_shorthand_field_patterns)]
        #derives
        #input

        #context_trait
        #(#source_impls)*
        #internal_impls

        #[allow(dead_code, clippy::ref_option)]
        fn format_context(
            context: &Option<std::borrow::Cow<'static, str>>,
        ) -> std::borrow::Cow<'static, str> {
            context.as_ref().map_or(std::borrow::Cow::Borrowed(""), |c| {
                std::borrow::Cow::Owned(format!(" ({c})"))
            })
        }
    })
}

fn ensure_unique_sources(variants: &[ErrorVariant<'_>]) -> syn::Result<()> {
    let mut seen = FxHashSet::default();
    for variant in variants {
        let Some((_, ty)) = variant.source else { continue };
        if !seen.insert(ty.to_token_stream().to_string()) {
            return Err(syn::Error::new_spanned(
                ty,
                "this source type is already wrapped by another variant",
            ));
        }
    }
    Ok(())
}

fn missing_derives(input: &DeriveInput) -> TokenStream {
    let present = derived_traits(input);
    let mut tokens = Vec::new();
    if !present.contains("Debug") {
        tokens.push(quote! { Debug });
    }
    if !present.contains("Error") {
        tokens.push(quote! { ::thiserror::Error });
    }
    if tokens.is_empty() {
        return TokenStream::new();
    }
    quote! { #[derive(#(#tokens),*)] }
}

fn derived_traits(input: &DeriveInput) -> FxHashSet<String> {
    let mut traits = FxHashSet::default();
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("derive")) {
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(segment) = meta.path.segments.last() {
                traits.insert(segment.ident.to_string());
            }
            Ok(())
        });
    }
    traits
}

fn context_trait(name: &Ident, ext: &Ident, variants: &[ErrorVariant<'_>]) -> TokenStream {
    let arms = variants.iter().filter(|v| v.has_context).map(|v| {
        let ident = v.ident;
        let cfg_attrs = &v.cfg_attrs;
        quote! { #(#cfg_attrs)* #name::#ident { context: slot, .. } => *slot = Some(context.into()), }
    });

    quote! {
        pub trait #ext<T> {
            fn context(
                self,
                context: impl Into<std::borrow::Cow<'static, str>>,
            ) -> std::result::Result<T, #name>;
        }

        #[automatically_derived]
        impl<T> #ext<T> for std::result::Result<T, #name> {
            #[inline]
            fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Self {
                self.map_err(|mut err| {
                    #[allow(unreachable_patterns)]
                    match &mut err {
                        #(#arms)*
                        _ => {},
                    }
                    err
                })
            }
        }
    }
}

fn source_impls(name: &Ident, ext: &Ident, v: &ErrorVariant<'_>) -> Option<TokenStream> {
    if v.is_internal() {
        return None;
    }
    let (field, ty) = v.source?;
    let ident = v.ident;
    let cfg_attrs = &v.cfg_attrs;

    Some(quote! {
        #(#cfg_attrs)*
        #[automatically_derived]
        impl From<#ty> for #name {
            #[inline]
            fn from(#field: #ty) -> Self {
                Self::#ident { #field, context: None }
            }
        }

        #(#cfg_attrs)*
        #[automatically_derived]
        impl<T> #ext<T> for std::result::Result<T, #ty> {
            #[inline]
            fn context(
                self,
                context: impl Into<std::borrow::Cow<'static, str>>,
            ) -> std::result::Result<T, #name> {
                self.map_err(|#field| #name::#ident { #field, context: Some(context.into()) })
            }
        }
    })
}

fn internal_impls(name: &Ident, v: &ErrorVariant<'_>) -> TokenStream {
    let ident = v.ident;
    let cfg_attrs = &v.cfg_attrs;

    quote! {
        #(#cfg_attrs)*
        impl From<&'static str> for #name {
            #[inline]
            fn from(message: &'static str) -> Self {
                Self::#ident { message: std::borrow::Cow::Borrowed(message), context: None }
            }
        }

        #(#cfg_attrs)*
        impl From<String> for #name {
            #[inline]
            fn from(message: String) -> Self {
                Self::#ident { message: std::borrow::Cow::Owned(message), context: None }
            }
        }
    }
}

fn is_source_field(field: &Field) -> bool {
    field.ident.as_ref().is_some_and(|i| i == "source")
        || field.attrs.iter().any(|a| a.path().is_ident("source") || a.path().is_ident("from"))
}

/// Accepts `Option<Cow<'static, str>>` with any path prefix on either type.
fn is_optional_cow(ty: &Type) -> bool {
    let Some(inner) = single_generic(ty, "Option") else {
        return false;
    };
    let Type::Path(path) = inner else {
        return false;
    };
    let Some(segment) = path.path.segments.last() else {
        return false;
    };
    if segment.ident != "Cow" {
        return false;
    }
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return false;
    };
    let mut args = args.args.iter();
    matches!(args.next(), Some(syn::GenericArgument::Lifetime(lt)) if lt.ident == "static")
        && matches!(
            args.next(),
            Some(syn::GenericArgument::Type(Type::Path(p)))
                if p.path.segments.last().is_some_and(|s| s.ident == "str")
        )
}

fn single_generic<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let Type::Path(path) = ty else { return None };
    let segment = path.path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let syn::PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        syn::GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}
