use heck::{ToKebabCase, ToShoutySnakeCase, ToSnakeCase};
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{
    parse_macro_input, Attribute, Data, DeriveInput, Expr, ExprLit, Fields, GenericArgument, Lit,
    Meta, PathArguments, Type,
};

/// Layers a config struct from a KDL file, `ACR_*` environment variables and
/// command line flags, in that order of precedence (flags win).
///
/// Generates a module named after the struct in snake case, holding a
/// builder of the same name whose fields are all optional. The builder
/// implements `clap::Args`, so it can be flattened into a parser, and
/// `Struct::resolve(builder)` turns it into the final config. `String`
/// fields are required, `Option<String>` fields may stay unset. Doc comments
/// on fields become the flag help.
#[proc_macro_derive(AppConfig)]
pub fn app_config_derive(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match expand(&ast) {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

struct ConfigField<'a> {
    ident: &'a syn::Ident,
    value_ty: &'a Type,
    optional: bool,
    help: Option<String>,
}

fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };

    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

fn doc_help(attrs: &[Attribute]) -> Option<String> {
    let lines = attrs
        .iter()
        .filter(|a| a.path().is_ident("doc"))
        .filter_map(|a| match &a.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(s), ..
                }) => Some(s.value().trim().to_string()),
                _ => None,
            },
            _ => None,
        })
        .collect::<Vec<_>>();

    if lines.is_empty() {
        None
    } else {
        Some(lines.join(" "))
    }
}

fn config_fields(ast: &DeriveInput) -> syn::Result<Vec<ConfigField<'_>>> {
    let Data::Struct(data) = &ast.data else {
        return Err(syn::Error::new_spanned(
            &ast.ident,
            "AppConfig can only be derived for structs",
        ));
    };
    let Fields::Named(named) = &data.fields else {
        return Err(syn::Error::new_spanned(
            &ast.ident,
            "AppConfig requires named fields",
        ));
    };

    named
        .named
        .iter()
        .map(|f| {
            let ident = f
                .ident
                .as_ref()
                .ok_or_else(|| syn::Error::new_spanned(f, "expected a named field"))?;
            let (value_ty, optional) = match option_inner(&f.ty) {
                Some(inner) => (inner, true),
                None => (&f.ty, false),
            };

            Ok(ConfigField {
                ident,
                value_ty,
                optional,
                help: doc_help(&f.attrs),
            })
        })
        .collect()
}

fn expand(ast: &DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &ast.ident;
    let namespace = syn::Ident::new(
        &struct_name.to_string().to_snake_case(),
        struct_name.span(),
    );

    let fields = config_fields(ast)?;

    let mut try_gen = TokenStream2::new();
    let mut field_gen = TokenStream2::new();
    let mut cli_gen = TokenStream2::new();
    let mut cli_args_gen = TokenStream2::new();
    let mut env_gen = TokenStream2::new();
    let mut config_gen = TokenStream2::new();

    for field in &fields {
        let ident = field.ident;
        let value_ty = field.value_ty;
        let name = ident.to_string();
        let long = name.to_kebab_case();
        let shouty = name.to_shouty_snake_case();

        try_gen.extend(if field.optional {
            quote! { #ident: value.#ident, }
        } else {
            quote! {
                #ident: value.#ident.ok_or(::anyhow::anyhow!("expected {} to be set", #name))?,
            }
        });

        field_gen.extend(quote! {
            pub #ident: Option<#value_ty>,
        });

        cli_gen.extend(quote! {
            if let Some(#ident) = matches.remove_one::<#value_ty>(#name) {
                self.#ident = Some(#ident);
            }
        });

        let help = field.help.as_ref().map(|help| quote! { .help(#help) });
        cli_args_gen.extend(quote! {
            .arg(
                ::clap::Arg::new(#name)
                    .long(#long)
                    .value_name(#shouty)
                    .action(::clap::ArgAction::Set)
                    .help_heading("Config")
                    .global(true)
                    #help
            )
        });

        env_gen.extend(quote! {
            if let Some(item) = source(&::acr_config::env_key(#shouty)) {
                ::tracing::trace!("found {} in env", #name);
                self.#ident = Some(item);
            }
        });

        config_gen.extend(quote! {
            if let Some(item) = config
                .get(#name)
                .and_then(|n| n.entries().first())
                .and_then(|e| e.value().as_string())
            {
                ::tracing::debug!("found {} in config file", #name);
                self.#ident = Some(item.to_string());
            }
        });
    }

    Ok(quote! {
        impl #struct_name {
            pub fn resolve(layers: #namespace::#struct_name) -> ::anyhow::Result<Self> {
                use ::anyhow::Context;

                let config = Self::try_from(layers).context("failed to resolve configuration")?;

                Ok(config)
            }
        }

        impl TryFrom<#namespace::#struct_name> for #struct_name {
            type Error = ::anyhow::Error;

            fn try_from(value: #namespace::#struct_name) -> Result<Self, Self::Error> {
                Ok(Self {
                    #try_gen
                })
            }
        }

        pub mod #namespace {
            #[derive(Default, Clone)]
            pub struct #struct_name {
                config_file: Option<::std::path::PathBuf>,

                #field_gen
            }

            impl #struct_name {
                /// The config file that was consulted, whether or not it existed.
                pub fn config_file(&self) -> Option<&::std::path::Path> {
                    self.config_file.as_deref()
                }

                /// Layers `matches` over the config file and `env` instead of
                /// the process environment.
                pub fn from_matches_with_env(
                    matches: &mut ::clap::ArgMatches,
                    env: ::acr_config::EnvSource<'_>,
                ) -> Self {
                    let mut s = Self::default();
                    s.load(matches, env);

                    s
                }

                fn load(&mut self, matches: &mut ::clap::ArgMatches, env: ::acr_config::EnvSource<'_>) {
                    use ::acr_config::{ConfigFile, Env};

                    let config_file = match matches.remove_one::<String>("config-file") {
                        Some(file) => Some(::std::path::PathBuf::from(file)),
                        None => match ::acr_config::default_config_file() {
                            Ok(file) => Some(file),
                            Err(e) => {
                                ::tracing::warn!("no config file location: {e}");
                                None
                            }
                        },
                    };

                    if let Some(config_file) = config_file {
                        if config_file.exists() {
                            if let Err(e) = self.set_from_config_file(&config_file) {
                                ::tracing::warn!("failed to read config from file: {e}");
                            }
                        } else {
                            ::tracing::trace!("no config file at: {}", config_file.display());
                        }
                        self.config_file = Some(config_file);
                    }

                    if let Err(e) = self.set_from_env_source(env) {
                        ::tracing::warn!("failed to read config from env: {e}");
                    }

                    #cli_gen
                }
            }

            impl ::clap::FromArgMatches for #struct_name {
                fn from_arg_matches(matches: &::clap::ArgMatches) -> Result<Self, ::clap::error::Error> {
                    let mut matches = matches.clone();
                    <Self as ::clap::FromArgMatches>::from_arg_matches_mut(&mut matches)
                }

                fn from_arg_matches_mut(matches: &mut ::clap::ArgMatches) -> Result<Self, ::clap::error::Error> {
                    Ok(Self::from_matches_with_env(matches, &::acr_config::process_env))
                }

                fn update_from_arg_matches(&mut self, matches: &::clap::ArgMatches) -> Result<(), ::clap::error::Error> {
                    let mut matches = matches.clone();
                    <Self as ::clap::FromArgMatches>::update_from_arg_matches_mut(self, &mut matches)
                }

                fn update_from_arg_matches_mut(&mut self, matches: &mut ::clap::ArgMatches) -> Result<(), ::clap::error::Error> {
                    self.load(matches, &::acr_config::process_env);

                    Ok(())
                }
            }

            impl ::clap::Args for #struct_name {
                fn augment_args(cmd: ::clap::Command) -> ::clap::Command {
                    cmd
                        .arg(
                            ::clap::Arg::new("config-file")
                                .long("config-file")
                                .value_name("PATH")
                                .action(::clap::ArgAction::Set)
                                .help("Path to the KDL config file")
                                .help_heading("Config")
                                .global(true)
                        )
                        #cli_args_gen
                }

                fn augment_args_for_update(cmd: ::clap::Command) -> ::clap::Command {
                    <Self as ::clap::Args>::augment_args(cmd)
                }
            }

            impl ::acr_config::Env for #struct_name {
                fn set_from_env_source(&mut self, source: ::acr_config::EnvSource<'_>) -> Result<(), ::acr_config::EnvError> {
                    #env_gen

                    Ok(())
                }
            }

            impl ::acr_config::ConfigFile for #struct_name {
                fn set_from_config_file(&mut self, config_file: &::std::path::Path) -> Result<(), ::acr_config::ConfigFileError> {
                    use ::anyhow::Context;

                    ::tracing::trace!("looking for kdl config at: {}", config_file.display());
                    let file_content = ::std::fs::read_to_string(config_file)
                        .context("failed to read config file")
                        .map_err(::acr_config::ConfigFileError::ConfigFileError)?;

                    let doc: ::kdl::KdlDocument = file_content
                        .parse()
                        .context("failed to parse kdl config file")
                        .map_err(::acr_config::ConfigFileError::ConfigFileError)?;

                    if let Some(config) = doc.get("config").and_then(|c| c.children()) {
                        ::tracing::debug!("found config");

                        #config_gen
                    }

                    Ok(())
                }
            }
        }
    })
}
