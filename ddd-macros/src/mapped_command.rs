use crate::derive_utils::apply_derives;
use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{
    Item, LitStr, Result, Token, Type, parse::Parse, parse::ParseStream, parse_macro_input,
};

/// #[mapped_command] 宏实现
/// - 生成 `::ddd_application::command::Command`（NAME 默认为结构体名）
/// - 生成 `::ddd_application::auto_mapping::MappedCommand`，字段按声明顺序映射
/// - 支持参数：`#[mapped_command(aggregate = Type, name = "...")]`
/// - 字段参数：`#[mapping(skip)]`、`#[mapping(rename = "...")]`，展开后移除
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as MappedCommandAttrConfig);
    let input = parse_macro_input!(item as Item);

    let mut st = match input {
        Item::Struct(s) => s,
        other => {
            return syn::Error::new(other.span(), "#[mapped_command] only on struct")
                .to_compile_error()
                .into();
        }
    };

    let fields_named = match &mut st.fields {
        syn::Fields::Named(f) => f,
        _ => {
            return syn::Error::new(st.span(), "only supports named-field struct")
                .to_compile_error()
                .into();
        }
    };

    // 收集参与映射的字段，同时剥离 #[mapping(..)]
    let mut idents = Vec::new();
    let mut types = Vec::new();
    let mut names = Vec::new();

    for field in fields_named.named.iter_mut() {
        let mapping = match take_mapping_attr(&mut field.attrs) {
            Ok(m) => m,
            Err(err) => return err.to_compile_error().into(),
        };
        if mapping.skip {
            continue;
        }

        let Some(ident) = field.ident.clone() else {
            continue;
        };
        let name = mapping
            .rename
            .unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));

        idents.push(ident);
        types.push(field.ty.clone());
        names.push(name);
    }

    apply_derives(
        &mut st.attrs,
        vec![syn::parse_quote!(Debug), syn::parse_quote!(Clone)],
    );

    let ident = &st.ident;
    let command_name = cfg
        .name
        .unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));
    let (impl_generics, ty_generics, where_clause) = st.generics.split_for_impl();

    let target: proc_macro2::TokenStream = match &cfg.aggregate {
        Some(ty) => quote! {
            ::ddd_application::auto_mapping::MappingTarget::constructor_of::<#ty>()
        },
        None => quote! { ::ddd_application::auto_mapping::MappingTarget::None },
    };

    let expanded = quote! {
        #st

        impl #impl_generics ::ddd_application::command::Command for #ident #ty_generics #where_clause {
            const NAME: &'static str = #command_name;
        }

        impl #impl_generics ::ddd_application::auto_mapping::MappedCommand for #ident #ty_generics #where_clause {
            fn mapping_target(&self) -> ::ddd_application::auto_mapping::MappingTarget {
                #target
            }

            fn mapped_properties(
                &self,
            ) -> ::std::vec::Vec<::ddd_application::auto_mapping::MappedProperty> {
                ::std::vec![
                    #( ::ddd_application::auto_mapping::MappedProperty::of::<#types>(#names) ),*
                ]
            }

            fn property_values(
                &self,
            ) -> ::std::vec::Vec<::ddd_application::auto_mapping::PropertyValue> {
                ::std::vec![
                    #( ::ddd_application::auto_mapping::PropertyValue::new(
                        ::std::clone::Clone::clone(&self.#idents)
                    ) ),*
                ]
            }
        }
    };

    TokenStream::from(expanded)
}

// -------- parsing --------

#[derive(Default)]
struct FieldMapping {
    skip: bool,
    rename: Option<LitStr>,
}

// 解析并移除字段上的 #[mapping(..)]，同一字段允许出现多次
fn take_mapping_attr(attrs: &mut Vec<syn::Attribute>) -> Result<FieldMapping> {
    let mut mapping = FieldMapping::default();
    let mut retained = Vec::with_capacity(attrs.len());

    for attr in attrs.drain(..) {
        if !attr.path().is_ident("mapping") {
            retained.push(attr);
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                mapping.skip = true;
                Ok(())
            } else if meta.path.is_ident("rename") {
                if mapping.rename.is_some() {
                    return Err(meta.error("duplicate key 'rename' in attribute"));
                }
                mapping.rename = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("unknown key; expected 'skip' | 'rename'"))
            }
        })?;
    }

    *attrs = retained;
    Ok(mapping)
}

struct MappedCommandAttrConfig {
    aggregate: Option<Type>,
    name: Option<LitStr>,
}

impl Parse for MappedCommandAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut aggregate: Option<Type> = None;
        let mut name: Option<LitStr> = None;

        let elems: Punctuated<MappedCommandAttrElem, Token![,]> =
            Punctuated::<MappedCommandAttrElem, Token![,]>::parse_terminated(input)?;

        for elem in elems.into_iter() {
            match elem {
                MappedCommandAttrElem::Aggregate(key, ty) => {
                    if aggregate.is_some() {
                        return Err(syn::Error::new(
                            key.span(),
                            "duplicate key 'aggregate' in attribute",
                        ));
                    }
                    aggregate = Some(*ty);
                }
                MappedCommandAttrElem::Name(key, lit) => {
                    if name.is_some() {
                        return Err(syn::Error::new(
                            key.span(),
                            "duplicate key 'name' in attribute",
                        ));
                    }
                    name = Some(lit);
                }
            }
        }

        Ok(Self { aggregate, name })
    }
}

enum MappedCommandAttrElem {
    Aggregate(syn::Ident, Box<Type>),
    Name(syn::Ident, LitStr),
}

impl Parse for MappedCommandAttrElem {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: syn::Ident = input.parse()?;
        let _eq: Token![=] = input.parse()?;
        if key == "aggregate" {
            let ty: Type = input.parse()?;
            Ok(MappedCommandAttrElem::Aggregate(key, Box::new(ty)))
        } else if key == "name" {
            let lit: LitStr = input.parse()?;
            Ok(MappedCommandAttrElem::Name(key, lit))
        } else {
            Err(syn::Error::new(
                key.span(),
                "unknown key; expected 'aggregate' | 'name'",
            ))
        }
    }
}
