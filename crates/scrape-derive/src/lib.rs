//! `#[derive(Scrape)]` - 生成字段访问表
//!
//! 类型属性:
//! - `#[scrape(namespace = "...")]` 覆盖命名空间 (默认 `module_path!()`)
//! - `#[scrape(name = "...")]` 覆盖类型名
//! - `#[scrape(info)]` 类型实现了 `HasInfo`，作为自描述
//! - `#[scrape(zeroed)]` 类型实现了 `Default`，空指针处可用零值占位
//!
//! 字段属性:
//! - `#[scrape(skip)]` 不遍历该字段

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    parse_macro_input, parse_quote, Attribute, Data, DeriveInput, Fields, GenericParam, Index,
    LitStr,
};

#[proc_macro_derive(Scrape, attributes(scrape))]
pub fn derive_scrape(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

#[derive(Default)]
struct TypeOptions {
    namespace: Option<LitStr>,
    name: Option<LitStr>,
    info: bool,
    zeroed: bool,
}

fn type_options(attrs: &[Attribute]) -> syn::Result<TypeOptions> {
    let mut options = TypeOptions::default();
    for attr in attrs.iter().filter(|a| a.path().is_ident("scrape")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("namespace") {
                options.namespace = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("name") {
                options.name = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("info") {
                options.info = true;
            } else if meta.path.is_ident("zeroed") {
                options.zeroed = true;
            } else {
                return Err(meta.error("expected `namespace`, `name`, `info` or `zeroed`"));
            }
            Ok(())
        })?;
    }
    Ok(options)
}

fn is_skipped(attrs: &[Attribute]) -> syn::Result<bool> {
    let mut skip = false;
    for attr in attrs.iter().filter(|a| a.path().is_ident("scrape")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else {
                Err(meta.error("expected `skip`"))
            }
        })?;
    }
    Ok(skip)
}

fn expand(input: DeriveInput) -> syn::Result<TokenStream2> {
    let options = type_options(&input.attrs)?;
    let ident = &input.ident;

    let namespace = match &options.namespace {
        Some(ns) => quote!(#ns),
        None => quote!(::core::module_path!()),
    };
    let type_name = match &options.name {
        Some(name) => name.clone(),
        None => LitStr::new(&ident.to_string(), ident.span()),
    };

    let fields = match &input.data {
        Data::Struct(data) => struct_fields(&data.fields)?,
        Data::Enum(data) => {
            let mut arms = Vec::with_capacity(data.variants.len());
            for variant in &data.variants {
                let variant_ident = &variant.ident;
                let (pattern, fields) = variant_fields(&variant.fields)?;
                arms.push(quote!(Self::#variant_ident #pattern => #fields,));
            }
            quote! {
                match self {
                    #(#arms)*
                }
            }
        }
        Data::Union(data) => {
            return Err(syn::Error::new(
                data.union_token.span,
                "Scrape cannot be derived for unions",
            ))
        }
    };

    let describe = if options.info {
        quote!(::core::option::Option::Some(self as &dyn ::scrape::HasInfo))
    } else {
        quote!(::core::option::Option::None)
    };

    // 类型参数需要可遍历
    let mut generics = input.generics.clone();
    for param in &mut generics.params {
        if let GenericParam::Type(ty) = param {
            ty.bounds.push(parse_quote!(::scrape::Scrape));
            ty.bounds.push(parse_quote!(::scrape::Declare));
        }
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let zeroed = if options.zeroed {
        quote! {
            fn zeroed() -> ::core::option::Option<::std::boxed::Box<dyn ::scrape::Scrape>> {
                ::core::option::Option::Some(::std::boxed::Box::new(
                    <Self as ::core::default::Default>::default(),
                ))
            }
        }
    } else {
        quote!()
    };

    let self_ty = quote!(#ident #ty_generics);
    let mut declare_generics = generics.clone();
    if options.zeroed {
        declare_generics
            .make_where_clause()
            .predicates
            .push(parse_quote!(#self_ty: ::core::default::Default + 'static));
    }
    let (_, _, declare_where) = declare_generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::scrape::Scrape for #ident #ty_generics #where_clause {
            fn shape(&self) -> ::scrape::Shape<'_> {
                ::scrape::Shape::Record(::scrape::Record {
                    identity: ::scrape::TypeIdentity::new(#namespace, #type_name),
                    describe: #describe,
                    fields: #fields,
                })
            }
        }

        impl #impl_generics ::scrape::Declare for #ident #ty_generics #declare_where {
            fn declared_type() -> ::core::option::Option<::scrape::TypeIdentity> {
                ::core::option::Option::Some(::scrape::TypeIdentity::new(#namespace, #type_name))
            }

            #zeroed
        }
    })
}

/// 结构体: `vec![Field::new("a", &self.a), ...]`
fn struct_fields(fields: &Fields) -> syn::Result<TokenStream2> {
    let mut entries = Vec::new();
    for (i, field) in fields.iter().enumerate() {
        if is_skipped(&field.attrs)? {
            continue;
        }
        let entry = match &field.ident {
            Some(name) => {
                let label = LitStr::new(&name.to_string(), name.span());
                quote!(::scrape::Field::new(#label, &self.#name))
            }
            None => {
                let index = Index::from(i);
                let label = LitStr::new(&i.to_string(), proc_macro2::Span::call_site());
                quote!(::scrape::Field::new(#label, &self.#index))
            }
        };
        entries.push(entry);
    }
    Ok(quote!(::std::vec![#(#entries),*]))
}

/// 枚举变体: (匹配模式, 字段列表)
fn variant_fields(fields: &Fields) -> syn::Result<(TokenStream2, TokenStream2)> {
    match fields {
        Fields::Named(named) => {
            let mut bindings = Vec::new();
            let mut entries = Vec::new();
            for field in &named.named {
                if is_skipped(&field.attrs)? {
                    continue;
                }
                if let Some(name) = &field.ident {
                    let label = LitStr::new(&name.to_string(), name.span());
                    bindings.push(quote!(#name));
                    entries.push(quote!(::scrape::Field::new(#label, #name)));
                }
            }
            Ok((
                quote!({ #(#bindings,)* .. }),
                quote!(::std::vec![#(#entries),*]),
            ))
        }
        Fields::Unnamed(unnamed) => {
            let mut bindings = Vec::new();
            let mut entries = Vec::new();
            for (i, field) in unnamed.unnamed.iter().enumerate() {
                if is_skipped(&field.attrs)? {
                    bindings.push(quote!(_));
                    continue;
                }
                let binding = format_ident!("__field{}", i);
                let label = LitStr::new(&i.to_string(), proc_macro2::Span::call_site());
                entries.push(quote!(::scrape::Field::new(#label, #binding)));
                bindings.push(quote!(#binding));
            }
            Ok((
                quote!((#(#bindings),*)),
                quote!(::std::vec![#(#entries),*]),
            ))
        }
        Fields::Unit => Ok((quote!(), quote!(::std::vec::Vec::new()))),
    }
}
