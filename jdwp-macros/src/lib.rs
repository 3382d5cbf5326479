use proc_macro::TokenStream;

use proc_macro2::Ident;
use quote::{quote, ToTokens};
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    token::Comma,
    Attribute, Data, DataEnum, DeriveInput, Error, Fields, GenericParam, Index, LitInt, Meta,
    Token, Type,
};

fn get_generic_names(generic_params: &Punctuated<GenericParam, Comma>) -> proc_macro2::TokenStream {
    use GenericParam::*;

    let generics = generic_params.iter().map(|param| match param {
        Type(type_param) => type_param.ident.to_token_stream(),
        Lifetime(lifetime_def) => lifetime_def.lifetime.to_token_stream(),
        Const(const_param) => const_param.ident.to_token_stream(),
    });
    quote!(#(#generics,)*)
}

fn enum_repr(attrs: &[Attribute], enum_data: &DataEnum) -> syn::Result<Type> {
    let repr = attrs
        .iter()
        .find(|attr| attr.path().is_ident("repr"))
        .ok_or_else(|| Error::new(enum_data.enum_token.span, "No explicit repr"))?;
    repr.parse_args::<Type>()
}

#[proc_macro_derive(JdwpReadable)]
pub fn jdwp_readable(item: TokenStream) -> TokenStream {
    let derive_input = syn::parse_macro_input!(item as DeriveInput);

    match &derive_input.data {
        Data::Struct(struct_data) => {
            let ident = derive_input.ident;
            let generic_params = derive_input.generics.params;
            let generic_names = get_generic_names(&generic_params);
            let generics_where = derive_input.generics.where_clause;
            let read = match &struct_data.fields {
                Fields::Unit => quote!(Ok(Self)),
                Fields::Named(named) => {
                    let fields = named.named.iter().filter_map(|f| f.ident.as_ref()).map(|name| {
                        quote!(#name: ::jdwp_server::codec::JdwpReadable::read(read)?)
                    });
                    quote!(Ok(Self { #(#fields),* }))
                }
                Fields::Unnamed(unnamed) => {
                    let fields = (0..unnamed.unnamed.len())
                        .map(|_| quote!(::jdwp_server::codec::JdwpReadable::read(read)?));
                    quote!(Ok(Self(#(#fields),*)))
                }
            };
            let tokens = quote! {
                impl<#generic_params> ::jdwp_server::codec::JdwpReadable for #ident<#generic_names> #generics_where {
                    fn read(read: &mut ::jdwp_server::codec::JdwpReader<'_>) -> ::std::result::Result<Self, ::jdwp_server::codec::DecodeError> {
                        #read
                    }
                }
            };
            tokens.into()
        }
        Data::Enum(enum_data) => {
            let repr = match enum_repr(&derive_input.attrs, enum_data) {
                Ok(repr) => repr,
                Err(err) => return err.to_compile_error().into(),
            };

            let mut match_arms = Vec::with_capacity(enum_data.variants.len());

            for v in &enum_data.variants {
                let Some((_, ref d)) = v.discriminant else {
                    return Error::new(v.span(), "No explicit discriminant")
                        .to_compile_error()
                        .into();
                };
                let name = &v.ident;
                let constructor = match &v.fields {
                    Fields::Named(named) => {
                        let fields = named.named.iter().filter_map(|f| f.ident.as_ref());
                        quote!( { #(#fields: ::jdwp_server::codec::JdwpReadable::read(read)?,)* } )
                    }
                    Fields::Unnamed(unnamed) => {
                        let fields = unnamed
                            .unnamed
                            .iter()
                            .map(|_| quote!(::jdwp_server::codec::JdwpReadable::read(read)?));
                        quote!( ( #(#fields),* ) )
                    }
                    Fields::Unit => quote!(),
                };
                match_arms.push(quote!(x if x == (#d) => Self::#name #constructor));
            }
            let ident = &derive_input.ident;
            let tokens = quote! {
                impl ::jdwp_server::codec::JdwpReadable for #ident {
                    fn read(read: &mut ::jdwp_server::codec::JdwpReader<'_>) -> ::std::result::Result<Self, ::jdwp_server::codec::DecodeError> {
                        let res = match <#repr as ::jdwp_server::codec::JdwpReadable>::read(read)? {
                            #(#match_arms,)*
                            other => return Err(::jdwp_server::codec::DecodeError::InvalidValue {
                                what: stringify!(#ident),
                                value: other as i64,
                            }),
                        };
                        Ok(res)
                    }
                }
            };
            tokens.into()
        }
        Data::Union(union_data) => Error::new(
            union_data.union_token.span,
            "Can derive JdwpReadable only for structs and enums with explicit discriminants",
        )
        .to_compile_error()
        .into(),
    }
}

#[proc_macro_derive(JdwpWritable)]
pub fn jdwp_writable(item: TokenStream) -> TokenStream {
    let derive_input = syn::parse_macro_input!(item as DeriveInput);

    match &derive_input.data {
        Data::Struct(struct_data) => {
            let accessors = match &struct_data.fields {
                Fields::Unit => Vec::new(),
                Fields::Named(named) => named
                    .named
                    .iter()
                    .filter_map(|f| f.ident.as_ref())
                    .map(|name| quote!(self.#name))
                    .collect(),
                Fields::Unnamed(unnamed) => (0..unnamed.unnamed.len())
                    .map(|i| {
                        let idx = Index::from(i);
                        quote!(self.#idx)
                    })
                    .collect(),
            };
            let ident = derive_input.ident;
            let generic_params = derive_input.generics.params;
            let generic_names = get_generic_names(&generic_params);
            let generics_where = derive_input.generics.where_clause;
            let tokens = quote! {
                impl<#generic_params> ::jdwp_server::codec::JdwpWritable for #ident<#generic_names> #generics_where {
                    fn length(&self) -> usize {
                        0 #(+ ::jdwp_server::codec::JdwpWritable::length(&#accessors))*
                    }

                    fn write<W: ::std::io::Write>(&self, write: &mut ::jdwp_server::codec::JdwpWriter<W>) -> ::std::io::Result<()> {
                        #(::jdwp_server::codec::JdwpWritable::write(&#accessors, write)?;)*
                        Ok(())
                    }
                }
            };
            tokens.into()
        }
        Data::Enum(enum_data) => {
            let repr = match enum_repr(&derive_input.attrs, enum_data) {
                Ok(repr) => repr,
                Err(err) => return err.to_compile_error().into(),
            };

            let mut length_arms = Vec::with_capacity(enum_data.variants.len());
            let mut write_arms = Vec::with_capacity(enum_data.variants.len());

            for v in &enum_data.variants {
                let Some((_, ref d)) = v.discriminant else {
                    return Error::new(v.span(), "No explicit discriminant")
                        .to_compile_error()
                        .into();
                };

                let (destruct, names) = match &v.fields {
                    Fields::Named(named) => {
                        let names = named
                            .named
                            .iter()
                            .filter_map(|f| f.ident.clone())
                            .collect::<Vec<_>>();
                        (quote!({ #(#names),* }), names)
                    }
                    Fields::Unnamed(unnamed) => {
                        let names = (0..unnamed.unnamed.len())
                            .map(|i| Ident::new(&format!("case_{i}"), unnamed.span()))
                            .collect::<Vec<_>>();
                        (quote!((#(#names),*)), names)
                    }
                    Fields::Unit => (quote!(), Vec::new()),
                };

                let name = &v.ident;

                length_arms.push(quote! {
                    Self::#name #destruct => {
                        <#repr as ::jdwp_server::codec::JdwpWritable>::length(&(#d))
                            #(+ ::jdwp_server::codec::JdwpWritable::length(#names))*
                    }
                });
                write_arms.push(quote! {
                    Self::#name #destruct => {
                        <#repr as ::jdwp_server::codec::JdwpWritable>::write(&(#d), write)?;
                        #(::jdwp_server::codec::JdwpWritable::write(#names, write)?;)*
                    }
                });
            }
            let ident = derive_input.ident;
            let tokens = quote! {
                impl ::jdwp_server::codec::JdwpWritable for #ident {
                    fn length(&self) -> usize {
                        match self {
                            #(#length_arms)*
                        }
                    }

                    fn write<W: ::std::io::Write>(&self, write: &mut ::jdwp_server::codec::JdwpWriter<W>) -> ::std::io::Result<()> {
                        match self {
                            #(#write_arms)*
                        }
                        Ok(())
                    }
                }
            };
            tokens.into()
        }
        Data::Union(union_data) => Error::new(
            union_data.union_token.span,
            "Can derive JdwpWritable only for structs and enums with explicit discriminants",
        )
        .to_compile_error()
        .into(),
    }
}

struct CommandAttr {
    reply_type: Type,
    command: ShortCommandAttr,
}

impl Parse for CommandAttr {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let reply_type = input.parse()?;
        let _ = input.parse::<Token![,]>()?;
        Ok(CommandAttr {
            reply_type,
            command: input.parse()?,
        })
    }
}

struct ShortCommandAttr {
    command_set: LitInt,
    command_id: LitInt,
}

impl ShortCommandAttr {
    fn long(self, reply_type: Type) -> CommandAttr {
        CommandAttr {
            reply_type,
            command: self,
        }
    }
}

impl Parse for ShortCommandAttr {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let command_set = input.parse()?;
        let _ = input.parse::<Token![,]>()?;
        Ok(ShortCommandAttr {
            command_set,
            command_id: input.parse()?,
        })
    }
}

fn field_doc(attrs: &[Attribute], ident: &Ident) -> Option<proc_macro2::TokenStream> {
    attrs
        .iter()
        .find(|a| a.path().is_ident("doc"))
        .and_then(|a| match &a.meta {
            Meta::NameValue(nv) => {
                let value = &nv.value;
                Some(quote! {
                    #[doc = stringify!(#ident)]
                    #[doc = " - "]
                    #[doc = #value]
                    #[doc = "\n"]
                })
            }
            _ => None,
        })
}

#[proc_macro_attribute]
pub fn jdwp_command(attr: TokenStream, item: TokenStream) -> TokenStream {
    let item = syn::parse_macro_input!(item as syn::ItemStruct);

    let attr = syn::parse::<CommandAttr>(attr.clone()).or_else(|_| {
        syn::parse::<ShortCommandAttr>(attr)
            .and_then(|sca| syn::parse_str(&format!("{}Reply", item.ident)).map(|t| sca.long(t)))
    });
    let CommandAttr {
        reply_type,
        command: ShortCommandAttr {
            command_set,
            command_id,
        },
    } = match attr {
        Ok(attr) => attr,
        Err(err) => return err.to_compile_error().into(),
    };

    let ident = &item.ident;
    let generic_params = &item.generics.params;
    let generic_names = get_generic_names(generic_params);
    let generics_where = &item.generics.where_clause;

    let new = if item.fields.is_empty() {
        quote!()
    } else {
        let mut docs = Vec::with_capacity(item.fields.len());
        let mut typed_idents = Vec::with_capacity(item.fields.len());
        let mut idents = Vec::with_capacity(item.fields.len());
        for f in &item.fields {
            let Some(ref ident) = f.ident else {
                return Error::new(item.fields.span(), "Command struct must use named fields")
                    .to_compile_error()
                    .into();
            };
            let ty = &f.ty;

            // strings are the only field type worth an Into conversion
            let string_magic = quote!(#ty).to_string() == "String";

            typed_idents.push(if string_magic {
                quote!(#ident: impl Into<String>)
            } else {
                quote!(#ident: #ty)
            });
            docs.push(field_doc(&f.attrs, ident));
            idents.push(if string_magic {
                quote!(#ident: #ident.into())
            } else {
                quote!(#ident)
            });
        }
        quote! {
            impl<#generic_params> #ident<#generic_names> #generics_where {
                /// Autogenerated constructor to create the command
                /// ### Arguments:
                #(#docs)*
                pub fn new(#(#typed_idents,)*) -> Self {
                    Self { #(#idents,)* }
                }
            }
        }
    };

    let tokens = quote! {
        #item
        #new

        impl<#generic_params> ::jdwp_server::spec::Command for #ident<#generic_names> #generics_where {
            const ID: ::jdwp_server::spec::CommandId = ::jdwp_server::spec::CommandId::new(#command_set, #command_id);
            type Reply = #reply_type;
        }
    };
    tokens.into()
}
