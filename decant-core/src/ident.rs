//! Identifier parsing
//!
//! Turns `[provider/]owner/repo[@version]` (or a configured alias) into one
//! provider-typed [`Source`]. Parsing is purely syntactic; which segment
//! means what depends on the segment count, the built-in provider
//! prefixes, the configured default source, and the custom-provider table.

use anyhow::{bail, Result};

use crate::config::{Config, Options};
use crate::source::{
    self, ForgejoSource, GitHubSource, GitLabSource, HashicorpSource, HelmSource, HomebrewSource,
    KubernetesSource, Source, SourceKind,
};

/// Apply the alias table to a raw identifier before parsing.
///
/// An alias may rewrite the name and pin a version; a version typed on the
/// command line wins over the alias's pin, with a warning when they differ.
pub fn apply_alias(identifier: &str, config: &Config) -> String {
    let (base, cli_version) = match identifier.split_once('@') {
        Some((base, version)) => (base, Some(version)),
        None => (identifier, None),
    };

    let Some(alias) = config.get_alias(base) else {
        return identifier.to_string();
    };

    let mut version = alias.version.unwrap_or_else(|| source::VERSION_LATEST.to_string());
    if let Some(cli) = cli_version {
        if version != source::VERSION_LATEST && version != cli {
            tracing::warn!("version specified via cli and alias, ignoring alias version");
        }
        version = cli.to_string();
    }

    format!("{}@{}", alias.name, version)
}

/// Parse an identifier into a source descriptor.
pub fn parse(identifier: &str, opts: &Options) -> Result<Source> {
    let (path, version) = match identifier.split_once('@') {
        Some((path, version)) => (path, version.to_string()),
        None => (identifier, source::VERSION_LATEST.to_string()),
    };

    let parts: Vec<&str> = path.split('/').collect();
    let config = &opts.config;

    match parts.as_slice() {
        [name] => parse_single_segment(name, &version, opts),
        [first, second] => parse_two_segments(first, second, &version, opts),
        _ => parse_many_segments(&parts, path, &version, opts),
    }
}

/// One segment: only meaningful under a default source that namespaces
/// single names (homebrew formulae, hashicorp products, kubernetes
/// binaries).
fn parse_single_segment(name: &str, version: &str, opts: &Options) -> Result<Source> {
    match opts.config.default_source.as_str() {
        source::HOMEBREW => Ok(Source::Homebrew(HomebrewSource::new(
            opts.clone(),
            name.to_string(),
            version.to_string(),
        ))),
        source::HASHICORP => Ok(Source::Hashicorp(HashicorpSource::new(
            opts.clone(),
            name.to_string(),
            name.to_string(),
            version.to_string(),
        ))),
        source::KUBERNETES => Ok(Source::Kubernetes(KubernetesSource::new(
            opts.clone(),
            name.to_string(),
            version.to_string(),
        ))),
        _ => bail!(
            "invalid install source, expect alias or format of owner/repo or owner/repo@version"
        ),
    }
}

/// Two segments: a built-in provider prefix, else `owner/repo` under the
/// default source.
fn parse_two_segments(first: &str, second: &str, version: &str, opts: &Options) -> Result<Source> {
    match first {
        source::HOMEBREW => {
            return Ok(Source::Homebrew(HomebrewSource::new(
                opts.clone(),
                second.to_string(),
                version.to_string(),
            )))
        }
        source::HASHICORP => {
            return Ok(Source::Hashicorp(HashicorpSource::new(
                opts.clone(),
                second.to_string(),
                second.to_string(),
                version.to_string(),
            )))
        }
        source::KUBERNETES => {
            return Ok(Source::Kubernetes(KubernetesSource::new(
                opts.clone(),
                second.to_string(),
                version.to_string(),
            )))
        }
        source::HELM => {
            return Ok(Source::Helm(HelmSource::new(
                opts.clone(),
                second.to_string(),
                version.to_string(),
            )))
        }
        _ => {}
    }

    match opts.config.default_source.as_str() {
        source::GITHUB => Ok(Source::GitHub(GitHubSource::new(
            opts.clone(),
            first.to_string(),
            second.to_string(),
            version.to_string(),
        ))),
        source::GITLAB => Ok(Source::GitLab(GitLabSource::new(
            opts.clone(),
            None,
            None,
            first.to_string(),
            second.to_string(),
            version.to_string(),
        ))),
        _ => bail!(
            "invalid install source, expect alias or format of owner/repo or owner/repo@version"
        ),
    }
}

/// Three or more segments: host aliases first (`github`/`github.com`,
/// anything starting with `gitlab`, the literal `codeberg`), then the
/// custom-provider table.
fn parse_many_segments(
    parts: &[&str],
    path: &str,
    version: &str,
    opts: &Options,
) -> Result<Source> {
    if parts[0].starts_with(source::GITHUB) {
        match parts[1] {
            source::HASHICORP => {
                return Ok(Source::Hashicorp(HashicorpSource::new(
                    opts.clone(),
                    parts[1].to_string(),
                    parts[2].to_string(),
                    version.to_string(),
                )))
            }
            source::KUBERNETES => {
                return Ok(Source::Kubernetes(KubernetesSource::new(
                    opts.clone(),
                    parts[2].to_string(),
                    version.to_string(),
                )))
            }
            source::HELM => {
                return Ok(Source::Helm(HelmSource::new(
                    opts.clone(),
                    parts[2].to_string(),
                    version.to_string(),
                )))
            }
            _ => {}
        }

        return Ok(Source::GitHub(GitHubSource::new(
            opts.clone(),
            parts[1].to_string(),
            parts[2].to_string(),
            version.to_string(),
        )));
    }

    if parts[0].starts_with(source::GITLAB) {
        let owner = parts[1..parts.len() - 1].join("/");
        let repo = parts[parts.len() - 1].to_string();

        return Ok(Source::GitLab(GitLabSource::new(
            opts.clone(),
            None,
            None,
            owner,
            repo,
            version.to_string(),
        )));
    }

    if parts[0] == source::CODEBERG {
        let owner = parts[1].to_string();
        let repo = parts[2..].join("/");

        return Ok(Source::Forgejo(ForgejoSource::new(
            opts.clone(),
            source::CODEBERG_BASE_URL.to_string(),
            Some(source::CODEBERG.to_string()),
            owner,
            repo,
            version.to_string(),
        )));
    }

    if let Some(provider) = opts.config.providers.get(parts[0]) {
        match provider.provider {
            SourceKind::GitLab => {
                let owner = parts[1..parts.len() - 1].join("/");
                let repo = parts[parts.len() - 1].to_string();

                return Ok(Source::GitLab(GitLabSource::new(
                    opts.clone(),
                    Some(provider.base_url.clone()),
                    Some(parts[0].to_string()),
                    owner,
                    repo,
                    version.to_string(),
                )));
            }
            SourceKind::Forgejo => {
                let owner = parts[1].to_string();
                let repo = parts[2..].join("/");

                return Ok(Source::Forgejo(ForgejoSource::new(
                    opts.clone(),
                    provider.base_url.clone(),
                    Some(parts[0].to_string()),
                    owner,
                    repo,
                    version.to_string(),
                )));
            }
            _ => {}
        }
    }

    bail!("unknown source: {}", path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CustomProvider;
    use pretty_assertions::assert_eq;

    fn options() -> Options {
        Options::new(Config::default())
    }

    fn options_with_default(default_source: &str) -> Options {
        let mut opts = options();
        opts.config.default_source = default_source.to_string();
        opts
    }

    fn options_with_forgejo_provider() -> Options {
        let mut opts = options();
        opts.config.providers.insert(
            "myforgejo".to_string(),
            CustomProvider {
                provider: SourceKind::Forgejo,
                base_url: "https://git.example.com/api/v1".to_string(),
            },
        );
        opts
    }

    #[test]
    fn test_owner_repo_defaults_to_github() {
        let source = parse("ekristen/aws-nuke", &options()).unwrap();
        assert_eq!(source.source(), "github");
        assert_eq!(source.app(), "ekristen/aws-nuke");

        let Source::GitHub(github) = &source else {
            panic!("expected a GitHub source");
        };
        assert_eq!(github.version, "latest");
    }

    #[test]
    fn test_github_host_prefixes() {
        for identifier in ["github/ekristen/aws-nuke", "github.com/ekristen/aws-nuke"] {
            let source = parse(identifier, &options()).unwrap();
            assert_eq!(source.source(), "github");
            assert_eq!(source.app(), "ekristen/aws-nuke");
        }
    }

    #[test]
    fn test_version_suffix() {
        for identifier in [
            "ekristen/aws-nuke@3.1.1",
            "github/ekristen/aws-nuke@3.1.1",
            "github.com/ekristen/aws-nuke@3.1.1",
        ] {
            let source = parse(identifier, &options()).unwrap();
            let Source::GitHub(github) = &source else {
                panic!("expected a GitHub source");
            };
            assert_eq!(github.version, "3.1.1");
        }
    }

    #[test]
    fn test_homebrew_prefix() {
        let source = parse("homebrew/aws-nuke", &options()).unwrap();
        assert_eq!(source.source(), "homebrew");
        assert_eq!(source.app(), "aws-nuke");
    }

    #[test]
    fn test_hashicorp_prefix() {
        let source = parse("hashicorp/terraform", &options()).unwrap();
        assert_eq!(source.source(), "hashicorp");
        assert_eq!(source.app(), "terraform/terraform");
    }

    #[test]
    fn test_single_segment_with_homebrew_default() {
        let source = parse("opentofu", &options_with_default("homebrew")).unwrap();
        assert_eq!(source.source(), "homebrew");
        assert_eq!(source.app(), "opentofu");
    }

    #[test]
    fn test_single_segment_with_hashicorp_default() {
        let source = parse("terraform", &options_with_default("hashicorp")).unwrap();
        assert_eq!(source.source(), "hashicorp");
    }

    #[test]
    fn test_single_segment_with_unknown_default_is_an_error() {
        let err = parse("terraform", &options_with_default("unknown")).unwrap_err();
        assert!(err.to_string().contains("invalid install source"));
    }

    #[test]
    fn test_two_segments_with_gitlab_default() {
        let source = parse("gitlab-org/gitlab-runner", &options_with_default("gitlab")).unwrap();
        assert_eq!(source.source(), "gitlab");
        assert_eq!(source.app(), "gitlab-org/gitlab-runner");
    }

    #[test]
    fn test_two_segments_with_unknown_default_is_an_error() {
        let err = parse("unknown/unknown", &options_with_default("unknown")).unwrap_err();
        assert!(err.to_string().contains("invalid install source"));
    }

    #[test]
    fn test_github_hashicorp_special_case() {
        let source = parse("github/hashicorp/terraform", &options()).unwrap();
        assert_eq!(source.source(), "hashicorp");
        assert_eq!(source.app(), "hashicorp/terraform");
    }

    #[test]
    fn test_gitlab_prefix_with_nested_groups() {
        let source = parse("gitlab/gitlab-org/security/tool", &options()).unwrap();
        assert_eq!(source.source(), "gitlab");
        assert_eq!(source.app(), "gitlab-org/security/tool");

        let Source::GitLab(gitlab) = &source else {
            panic!("expected a GitLab source");
        };
        assert_eq!(gitlab.owner, "gitlab-org/security");
        assert_eq!(gitlab.repo, "tool");
    }

    #[test]
    fn test_codeberg_shorthand() {
        let source = parse("codeberg/owner/repo", &options()).unwrap();
        assert_eq!(source.source(), "codeberg");
        assert_eq!(source.app(), "owner/repo");

        let Source::Forgejo(forgejo) = &source else {
            panic!("expected a Forgejo source");
        };
        assert_eq!(forgejo.base_url, source::CODEBERG_BASE_URL);
        assert_eq!(forgejo.version, "latest");
    }

    #[test]
    fn test_codeberg_shorthand_with_version() {
        let source = parse("codeberg/owner/repo@2.0.0", &options()).unwrap();
        let Source::Forgejo(forgejo) = &source else {
            panic!("expected a Forgejo source");
        };
        assert_eq!(forgejo.version, "2.0.0");
    }

    // forgejo as a default source is not supported: it needs an explicit
    // base URL, which only a configured provider carries.
    #[test]
    fn test_forgejo_default_source_is_an_error() {
        let err = parse("owner/repo", &options_with_default("forgejo")).unwrap_err();
        assert!(err.to_string().contains("invalid install source"));
    }

    #[test]
    fn test_configured_forgejo_provider() {
        let source = parse("myforgejo/someowner/somerepo", &options_with_forgejo_provider()).unwrap();
        assert_eq!(source.source(), "myforgejo");
        assert_eq!(source.app(), "someowner/somerepo");

        let Source::Forgejo(forgejo) = &source else {
            panic!("expected a Forgejo source");
        };
        assert_eq!(forgejo.base_url, "https://git.example.com/api/v1");
    }

    #[test]
    fn test_configured_forgejo_provider_with_version() {
        let source =
            parse("myforgejo/someowner/somerepo@1.2.3", &options_with_forgejo_provider()).unwrap();
        let Source::Forgejo(forgejo) = &source else {
            panic!("expected a Forgejo source");
        };
        assert_eq!(forgejo.version, "1.2.3");
    }

    #[test]
    fn test_configured_gitlab_provider() {
        let mut opts = options();
        opts.config.providers.insert(
            "mygitlab".to_string(),
            CustomProvider {
                provider: SourceKind::GitLab,
                base_url: "https://gitlab.example.com/api/v4".to_string(),
            },
        );

        let source = parse("mygitlab/group/subgroup/project", &opts).unwrap();
        assert_eq!(source.source(), "mygitlab");

        let Source::GitLab(gitlab) = &source else {
            panic!("expected a GitLab source");
        };
        assert_eq!(gitlab.owner, "group/subgroup");
        assert_eq!(gitlab.repo, "project");
        assert_eq!(gitlab.base_url.as_deref(), Some("https://gitlab.example.com/api/v4"));
    }

    #[test]
    fn test_unknown_three_segment_prefix_is_an_error() {
        let err = parse("unknown/some-owner/some-repo", &options()).unwrap_err();
        assert!(err.to_string().contains("unknown source"));

        let err = parse("unknown/some-owner/some-repo/extra@3.1.1", &options()).unwrap_err();
        assert!(err.to_string().contains("unknown source"));
    }

    #[test]
    fn test_apply_alias_rewrites_name() {
        let mut config = Config::default();
        config
            .aliases
            .insert("nuke".to_string(), "ekristen/aws-nuke".to_string());

        assert_eq!(apply_alias("nuke", &config), "ekristen/aws-nuke@latest");
        assert_eq!(apply_alias("nuke@3.1.1", &config), "ekristen/aws-nuke@3.1.1");
        assert_eq!(apply_alias("other/tool", &config), "other/tool");
    }

    #[test]
    fn test_apply_alias_cli_version_wins() {
        let mut config = Config::default();
        config
            .aliases
            .insert("dist".to_string(), "ekristen/distillery@3.0.0".to_string());

        assert_eq!(apply_alias("dist", &config), "ekristen/distillery@3.0.0");
        assert_eq!(apply_alias("dist@3.1.0", &config), "ekristen/distillery@3.1.0");
    }
}
