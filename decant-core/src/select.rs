//! Asset selection
//!
//! Given the assets of one release, pick the file to install for a target
//! OS/arch. This is a deliberately small filename-token scorer: checksum
//! and signature files are never candidates, platform tokens dominate,
//! and an explicit asset name bypasses scoring entirely.

use anyhow::{bail, Result};

use crate::clients::ReleaseAsset;

/// File suffixes that are metadata about assets, not assets
const METADATA_SUFFIXES: &[&str] = &[
    ".sha256", ".sha512", ".sig", ".asc", ".pem", ".sbom", ".json", ".txt",
];

/// Pick one asset for `os`/`arch`, or the asset named by `override_name`.
pub fn pick<'a>(
    assets: &'a [ReleaseAsset],
    app_hint: &str,
    os: &str,
    arch: &str,
    override_name: Option<&str>,
) -> Result<&'a ReleaseAsset> {
    if let Some(name) = override_name {
        return assets
            .iter()
            .find(|a| a.name == name)
            .ok_or_else(|| anyhow::anyhow!("no asset named {} in this release", name));
    }

    let best = assets
        .iter()
        .map(|asset| (score(&asset.name, app_hint, os, arch), asset))
        .filter(|(score, _)| *score > 0)
        .max_by_key(|(score, _)| *score);

    match best {
        Some((_, asset)) => Ok(asset),
        None => bail!("unable to find a matching asset for {}/{}", os, arch),
    }
}

fn score(name: &str, app_hint: &str, os: &str, arch: &str) -> i32 {
    let name = name.to_lowercase();

    if is_metadata(&name) || name.contains("checksum") {
        return 0;
    }

    let mut score = 0;

    if os_tokens(os).iter().any(|t| name.contains(t)) {
        score += 10;
    }
    if arch_tokens(arch).iter().any(|t| name.contains(t)) {
        score += 5;
    }
    if name.contains(&app_hint.to_lowercase()) {
        score += 2;
    }
    // Archives and bare binaries over packages (.deb, .rpm, .apk)
    if name.ends_with(".tar.gz")
        || name.ends_with(".tgz")
        || name.ends_with(".zip")
        || name.ends_with(".tar.xz")
    {
        score += 1;
    } else if name.ends_with(".deb") || name.ends_with(".rpm") || name.ends_with(".apk") {
        score -= 3;
    }

    score
}

fn is_metadata(name: &str) -> bool {
    METADATA_SUFFIXES.iter().any(|s| name.ends_with(s))
}

fn os_tokens(os: &str) -> &'static [&'static str] {
    match os {
        "darwin" => &["darwin", "macos", "osx"],
        "windows" => &["windows", "win64", "win32"],
        "linux" => &["linux"],
        _ => &[],
    }
}

fn arch_tokens(arch: &str) -> &'static [&'static str] {
    match arch {
        "amd64" => &["amd64", "x86_64", "x64"],
        "arm64" => &["arm64", "aarch64"],
        "386" => &["386", "i386", "x86"],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn asset(name: &str) -> ReleaseAsset {
        ReleaseAsset {
            id: 0,
            name: name.to_string(),
            size: 0,
            download_count: 0,
            created_at: None,
            uuid: None,
            browser_download_url: format!("https://example.com/{name}"),
        }
    }

    #[test]
    fn test_picks_matching_platform() {
        let assets = vec![
            asset("myapp-darwin-arm64.tar.gz"),
            asset("myapp-linux-amd64.tar.gz"),
            asset("myapp-windows-amd64.zip"),
        ];

        let picked = pick(&assets, "myapp", "linux", "amd64", None).unwrap();
        assert_eq!(picked.name, "myapp-linux-amd64.tar.gz");
    }

    #[test]
    fn test_arch_aliases() {
        let assets = vec![
            asset("myapp-linux-x86_64.tar.gz"),
            asset("myapp-linux-aarch64.tar.gz"),
        ];

        let picked = pick(&assets, "myapp", "linux", "arm64", None).unwrap();
        assert_eq!(picked.name, "myapp-linux-aarch64.tar.gz");
    }

    #[test]
    fn test_skips_checksum_and_signature_files() {
        let assets = vec![
            asset("myapp-linux-amd64.tar.gz.sha256"),
            asset("myapp-linux-amd64.tar.gz.sig"),
            asset("checksums.txt"),
            asset("myapp-linux-amd64.tar.gz"),
        ];

        let picked = pick(&assets, "myapp", "linux", "amd64", None).unwrap();
        assert_eq!(picked.name, "myapp-linux-amd64.tar.gz");
    }

    #[test]
    fn test_no_match_is_an_error() {
        let assets = vec![asset("myapp-windows-amd64.zip")];

        let err = pick(&assets, "myapp", "linux", "arm64", None).unwrap_err();
        assert!(err.to_string().contains("unable to find a matching asset"));
    }

    #[test]
    fn test_override_name_bypasses_scoring() {
        let assets = vec![
            asset("myapp-linux-amd64.tar.gz"),
            asset("oddly-named-build.bin"),
        ];

        let picked = pick(&assets, "myapp", "linux", "amd64", Some("oddly-named-build.bin")).unwrap();
        assert_eq!(picked.name, "oddly-named-build.bin");

        let err = pick(&assets, "myapp", "linux", "amd64", Some("missing.bin")).unwrap_err();
        assert!(err.to_string().contains("no asset named"));
    }

    #[test]
    fn test_prefers_archive_over_package() {
        let assets = vec![
            asset("myapp-linux-amd64.deb"),
            asset("myapp-linux-amd64.tar.gz"),
        ];

        let picked = pick(&assets, "myapp", "linux", "amd64", None).unwrap();
        assert_eq!(picked.name, "myapp-linux-amd64.tar.gz");
    }
}
