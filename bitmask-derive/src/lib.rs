use proc_macro::TokenStream;
use proc_macro2::{TokenStream as TokenStream2, TokenTree};
use quote::{ToTokens, quote};
use syn::{
    Data, DeriveInput, Error, Expr, ExprLit, Fields, Generics, Ident, Lit, LitStr, Meta, Result,
    Type, ext::IdentExt, parse_macro_input,
};

// =============================================================================
// Record derive
// =============================================================================

/// Derives `bitmask::Record` and `bitmask::Target` for a struct.
///
/// Fields opt in with `#[bitmask = "N"]`. The tag text is stored verbatim and
/// validated when the record is encoded or decoded, not here.
#[proc_macro_derive(Record, attributes(bitmask))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match derive_record_impl(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn derive_record_impl(input: DeriveInput) -> Result<TokenStream2> {
    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(f) => &f.named,
            _ => {
                return Err(Error::new_spanned(
                    &input,
                    "Record requires a struct with named fields",
                ));
            }
        },
        _ => {
            return Err(Error::new_spanned(
                &input,
                "Record can only be derived for structs",
            ));
        }
    };

    let generic_names = GenericNames::new(&input.generics);
    let members: Vec<MemberDef> = fields
        .iter()
        .map(|f| parse_member(f, &generic_names))
        .collect::<Result<_>>()?;

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let table = generate_field_table(&members);
    let truthy_arms = generate_truthy_arms(&members);
    let mark_arms = generate_mark_arms(&members);

    Ok(quote! {
        impl #impl_generics ::bitmask::Record for #name #ty_generics #where_clause {
            #[inline]
            fn fields(&self) -> &'static [::bitmask::Field] {
                #[allow(unused_imports)]
                use ::bitmask::__private::Inert as _;
                const FIELDS: &[::bitmask::Field] = &[#(#table),*];
                FIELDS
            }

            #[inline]
            fn is_truthy(&self, index: usize) -> bool {
                #[allow(unused_imports)]
                use ::bitmask::__private::Inert as _;
                match index {
                    #(#truthy_arms)*
                    _ => false,
                }
            }

            #[inline]
            fn mark(&mut self, index: usize) {
                #[allow(unused_imports)]
                use ::bitmask::__private::Inert as _;
                match index {
                    #(#mark_arms)*
                    _ => {}
                }
            }
        }

        impl #impl_generics ::bitmask::Target for #name #ty_generics #where_clause {
            #[inline]
            fn resolve(&self) -> ::bitmask::Resolved<'_> {
                ::bitmask::Resolved::Record(self)
            }

            #[inline]
            fn resolve_mut(&mut self) -> ::bitmask::ResolvedMut<'_> {
                ::bitmask::ResolvedMut::Record(self)
            }
        }
    })
}

// =============================================================================
// Attribute parsing
// =============================================================================

/// Parsed field from struct
struct MemberDef {
    ident: Ident,
    ty: Type,
    tag: Option<LitStr>,
    /// Kind is resolved from the type. False for types that depend on the
    /// struct's generics; those fields are inert.
    resolved: bool,
}

fn parse_member(field: &syn::Field, generics: &GenericNames) -> Result<MemberDef> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| Error::new_spanned(field, "tuple structs not supported"))?;

    let mut tag = None;
    for attr in &field.attrs {
        if !attr.path().is_ident("bitmask") {
            continue;
        }
        if tag.is_some() {
            return Err(Error::new_spanned(attr, "duplicate #[bitmask] attribute"));
        }
        tag = Some(parse_tag(&attr.meta)?);
    }

    Ok(MemberDef {
        ident,
        ty: field.ty.clone(),
        tag,
        resolved: !generics.mentioned_in(&field.ty),
    })
}

fn parse_tag(meta: &Meta) -> Result<LitStr> {
    if let Meta::NameValue(nv) = meta {
        if let Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) = &nv.value
        {
            return Ok(s.clone());
        }
        return Err(Error::new_spanned(
            &nv.value,
            "bitmask tag must be a string literal, e.g. #[bitmask = \"1\"]",
        ));
    }
    Err(Error::new_spanned(
        meta,
        "expected #[bitmask = \"N\"] with N in 1..=64",
    ))
}

// =============================================================================
// Helpers
// =============================================================================

/// Type, const and lifetime parameters of the deriving struct.
///
/// The field table is a `const` inside the impl, and such items cannot name
/// outer generics, so fields whose type mentions one are not resolved.
struct GenericNames {
    idents: Vec<String>,
    lifetimes: Vec<String>,
}

impl GenericNames {
    fn new(generics: &Generics) -> Self {
        let mut idents = vec!["Self".to_string()];
        idents.extend(generics.type_params().map(|p| p.ident.to_string()));
        idents.extend(generics.const_params().map(|p| p.ident.to_string()));
        let lifetimes = generics
            .lifetimes()
            .map(|l| l.lifetime.ident.to_string())
            .collect();
        Self { idents, lifetimes }
    }

    fn mentioned_in(&self, ty: &Type) -> bool {
        self.scan(ty.to_token_stream())
    }

    fn scan(&self, tokens: TokenStream2) -> bool {
        let mut after_quote = false;
        for tt in tokens {
            match tt {
                TokenTree::Ident(ident) => {
                    let name = ident.to_string();
                    let hit = if after_quote {
                        self.lifetimes.contains(&name)
                    } else {
                        self.idents.contains(&name)
                    };
                    if hit {
                        return true;
                    }
                    after_quote = false;
                }
                TokenTree::Punct(p) => after_quote = p.as_char() == '\'',
                TokenTree::Group(g) => {
                    if self.scan(g.stream()) {
                        return true;
                    }
                    after_quote = false;
                }
                TokenTree::Literal(_) => after_quote = false,
            }
        }
        false
    }
}

// =============================================================================
// Codegen
// =============================================================================

fn generate_field_table(members: &[MemberDef]) -> Vec<TokenStream2> {
    members
        .iter()
        .map(|m| {
            let name = m.ident.unraw().to_string();
            let tag = match &m.tag {
                Some(lit) => lit.value(),
                None => String::new(),
            };
            let kind = if m.resolved {
                let ty = &m.ty;
                quote! { <::bitmask::__private::KindOf<#ty>>::KIND }
            } else {
                quote! { ::core::option::Option::None }
            };
            quote! { ::bitmask::Field::new(#name, #tag, #kind) }
        })
        .collect()
}

fn generate_truthy_arms(members: &[MemberDef]) -> Vec<TokenStream2> {
    members
        .iter()
        .enumerate()
        .filter(|(_, m)| m.resolved)
        .map(|(index, m)| {
            let ident = &m.ident;
            let ty = &m.ty;
            quote! {
                #index => <::bitmask::__private::KindOf<#ty>>::is_truthy(&self.#ident),
            }
        })
        .collect()
}

fn generate_mark_arms(members: &[MemberDef]) -> Vec<TokenStream2> {
    members
        .iter()
        .enumerate()
        .filter(|(_, m)| m.resolved)
        .map(|(index, m)| {
            let ident = &m.ident;
            let ty = &m.ty;
            quote! {
                #index => <::bitmask::__private::KindOf<#ty>>::mark(&mut self.#ident),
            }
        })
        .collect()
}
