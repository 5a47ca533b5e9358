// src/secrets.rs

//! Dereferencing secret URIs (e.g. the GitHub access token).
//!
//! Supported schemes:
//! - `env://NAME`: the value of environment variable `NAME`.
//! - `file:///path/to/token`: file contents, trailing newline trimmed.
//! - `constant://?val=VALUE`: the literal `VALUE`.

use anyhow::{Context, anyhow, bail};

use crate::errors::{RepolaunchError, Result};
use crate::types::BoxFuture;

/// Resolves a secret URI to its value.
pub trait SecretResolver: Send + Sync {
    fn resolve<'a>(&'a self, uri: &'a str) -> BoxFuture<'a, anyhow::Result<String>>;
}

/// Resolver for the `env://`, `file://` and `constant://` schemes.
#[derive(Debug, Clone, Copy, Default)]
pub struct UriSecretResolver;

impl UriSecretResolver {
    async fn resolve_uri(&self, uri: &str) -> anyhow::Result<String> {
        let (scheme, rest) = uri
            .split_once("://")
            .ok_or_else(|| anyhow!("missing scheme (expected env://, file:// or constant://)"))?;

        let value = match scheme {
            "env" => {
                let name = rest.trim_end_matches('/');
                if name.is_empty() {
                    bail!("env:// URI has no variable name");
                }
                std::env::var(name).with_context(|| format!("reading environment variable {name}"))?
            }
            "file" => {
                let contents = tokio::fs::read_to_string(rest)
                    .await
                    .with_context(|| format!("reading {rest}"))?;
                contents.trim_end_matches(['\r', '\n']).to_string()
            }
            "constant" => constant_value(rest)?,
            other => bail!("unsupported scheme '{other}'"),
        };

        if value.is_empty() {
            bail!("secret is empty");
        }
        Ok(value)
    }
}

/// Extract `val` from the query string of `constant://?val=...`.
fn constant_value(rest: &str) -> anyhow::Result<String> {
    let query = rest
        .split_once('?')
        .map(|(_, q)| q)
        .ok_or_else(|| anyhow!("constant:// URI has no query string"))?;

    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "val")
        .map(|(_, value)| value.to_string())
        .ok_or_else(|| anyhow!("constant:// URI has no 'val' parameter"))
}

impl SecretResolver for UriSecretResolver {
    fn resolve<'a>(&'a self, uri: &'a str) -> BoxFuture<'a, anyhow::Result<String>> {
        Box::pin(self.resolve_uri(uri))
    }
}

/// Resolve `uri`, mapping any failure to [`RepolaunchError::Secret`].
///
/// The error carries the URI, never the value.
pub async fn resolve_secret(resolver: &dyn SecretResolver, uri: &str) -> Result<String> {
    resolver
        .resolve(uri)
        .await
        .map_err(|e| RepolaunchError::Secret {
            uri: uri.to_string(),
            reason: format!("{e:#}"),
        })
}
