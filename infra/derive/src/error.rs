use fxhash::FxHashSet;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    Attribute, Data, DeriveInput, Fields, FieldsNamed, GenericArgument, Ident, PathArguments,
    Type, Variant,
};

pub(crate) fn expand(input: DeriveInput) -> TokenStream {
    match ErrorEnum::parse(&input) {
        Ok(model) => model.generate(&input),
        Err(err) => err.to_compile_error(),
    }
}

struct ErrorEnum<'a> {
    ident: &'a Ident,
    ext_ident: Ident,
    variants: Vec<ErrorVariant<'a>>,
}

struct ErrorVariant<'a> {
    ident: &'a Ident,
    cfg: Vec<&'a Attribute>,
    source: Option<SourceField<'a>>,
}

struct SourceField<'a> {
    ident: &'a Ident,
    ty: &'a Type,
}

impl<'a> ErrorEnum<'a> {
    fn parse(input: &'a DeriveInput) -> syn::Result<Self> {
        let Data::Enum(data) = &input.data else {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "swb_error can only be applied to enums",
            ));
        };

        let variants =
            data.variants.iter().map(ErrorVariant::parse).collect::<syn::Result<Vec<_>>>()?;

        Ok(Self { ident: &input.ident, ext_ident: format_ident!("{}Ext", input.ident), variants })
    }

    fn generate(&self, input: &DeriveInput) -> TokenStream {
        let name = self.ident;
        let ext = &self.ext_ident;

        let existing = existing_derives(&input.attrs);
        let mut extra = Vec::new();
        if !existing.contains("Debug") {
            extra.push(quote! { Debug });
        }
        if !existing.contains("Error") {
            extra.push(quote! { ::thiserror::Error });
        }
        let derives = (!extra.is_empty()).then(|| quote! { #[derive(#(#extra),*)] });

        let context_arms = self.variants.iter().map(|v| {
            let (ident, cfg) = (v.ident, &v.cfg);
            quote! { #(#cfg)* #name::#ident { context: slot, .. } => *slot = Some(context.into()), }
        });

        let from_impls = self.variants.iter().filter_map(|v| v.source_conversions(name, ext));
        let internal_impls = self.internal_conversions();

        quote! {
            #[allow(non_shorthand_field_patterns)]
            #derives
            #input

            pub trait #ext<T> {
                fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Result<T, #name>;
            }

            #[automatically_derived]
            impl<T> #ext<T> for Result<T, #name> {
                #[inline]
                fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> Self {
                    self.map_err(|mut err| {
                        match &mut err {
                            #( #context_arms )*
                        }
                        err
                    })
                }
            }

            #( #from_impls )*
            #internal_impls

            #[allow(dead_code)]
            fn format_context(context: &Option<std::borrow::Cow<'static, str>>) -> std::borrow::Cow<'static, str> {
                context.as_ref().map_or(std::borrow::Cow::Borrowed(""), |c| std::borrow::Cow::Owned(format!(" ({c})")))
            }
        }
    }

    fn internal_conversions(&self) -> TokenStream {
        let Some(internal) = self.variants.iter().find(|v| v.ident == "Internal") else {
            return quote!();
        };
        let name = self.ident;
        let cfg = &internal.cfg;

        quote! {
            #(#cfg)*
            impl From<&'static str> for #name {
                #[inline]
                fn from(message: &'static str) -> Self {
                    Self::Internal { message: std::borrow::Cow::Borrowed(message), context: None }
                }
            }
            #(#cfg)*
            impl From<String> for #name {
                #[inline]
                fn from(message: String) -> Self {
                    Self::Internal { message: std::borrow::Cow::Owned(message), context: None }
                }
            }
        }
    }
}

impl<'a> ErrorVariant<'a> {
    fn parse(variant: &'a Variant) -> syn::Result<Self> {
        let Fields::Named(fields) = &variant.fields else {
            return Err(syn::Error::new_spanned(
                &variant.ident,
                "swb_error variants must use named fields",
            ));
        };

        let context = fields
            .named
            .iter()
            .find(|field| field.ident.as_ref().is_some_and(|ident| ident == "context"));
        let Some(context) = context else {
            return Err(syn::Error::new_spanned(
                &variant.ident,
                "swb_error variants require a `context: Option<Cow<'static, str>>` field",
            ));
        };
        if !is_context_type(&context.ty) {
            return Err(syn::Error::new_spanned(
                &context.ty,
                "context field must be `Option<Cow<'static, str>>`",
            ));
        }

        let cfg = variant.attrs.iter().filter(|attr| attr.path().is_ident("cfg")).collect();

        Ok(Self { ident: &variant.ident, cfg, source: find_source(fields) })
    }

    fn source_conversions(&self, name: &Ident, ext: &Ident) -> Option<TokenStream> {
        if self.ident == "Internal" {
            return None;
        }
        let source = self.source.as_ref()?;
        let (v_ident, cfg) = (self.ident, &self.cfg);
        let (field, ty) = (source.ident, source.ty);

        Some(quote! {
            #(#cfg)*
            #[automatically_derived]
            impl From<#ty> for #name {
                #[inline]
                fn from(#field: #ty) -> Self { Self::#v_ident { #field, context: None } }
            }

            #(#cfg)*
            impl<T> #ext<T> for std::result::Result<T, #ty> {
                #[inline]
                fn context(self, context: impl Into<std::borrow::Cow<'static, str>>) -> std::result::Result<T, #name> {
                    self.map_err(|#field| #name::#v_ident { #field, context: Some(context.into()) })
                }
            }
        })
    }
}

fn find_source(fields: &FieldsNamed) -> Option<SourceField<'_>> {
    fields.named.iter().find_map(|field| {
        let ident = field.ident.as_ref()?;
        let marked = field
            .attrs
            .iter()
            .any(|attr| attr.path().is_ident("source") || attr.path().is_ident("from"));
        (ident == "source" || marked).then_some(SourceField { ident, ty: &field.ty })
    })
}

fn existing_derives(attrs: &[Attribute]) -> FxHashSet<String> {
    let mut found = FxHashSet::default();

    for attr in attrs {
        if !attr.path().is_ident("derive") {
            continue;
        }
        let _ = attr.parse_nested_meta(|meta| {
            if let Some(segment) = meta.path.segments.last() {
                found.insert(segment.ident.to_string());
            }
            Ok(())
        });
    }

    found
}

fn is_context_type(ty: &Type) -> bool {
    let Some((ident, args)) = last_segment(ty) else {
        return false;
    };
    if ident != "Option" {
        return false;
    }
    let Some(GenericArgument::Type(inner)) = args.first() else {
        return false;
    };
    let Some((inner_ident, inner_args)) = last_segment(inner) else {
        return false;
    };
    if inner_ident != "Cow" {
        return false;
    }

    let mut inner_args = inner_args.into_iter();
    let Some(GenericArgument::Lifetime(lifetime)) = inner_args.next() else {
        return false;
    };
    let Some(GenericArgument::Type(target)) = inner_args.next() else {
        return false;
    };
    lifetime.ident == "static"
        && last_segment(target).is_some_and(|(ident, args)| ident == "str" && args.is_empty())
}

fn last_segment(ty: &Type) -> Option<(&Ident, Vec<&GenericArgument>)> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    let args = match &segment.arguments {
        PathArguments::None => Vec::new(),
        PathArguments::AngleBracketed(args) => args.args.iter().collect(),
        PathArguments::Parenthesized(_) => return None,
    };
    Some((&segment.ident, args))
}
