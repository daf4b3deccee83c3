//! Download command - fetches and unpacks dependency source archives.
//!
//! Tarballs are streamed straight from curl into tar; zip archives are saved
//! and then unzipped. Downloads from the same host run sequentially so no
//! single server sees concurrent requests; `-j` controls how many hosts are
//! fetched from at once.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::process::Command;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Archive extensions we know how to unpack, including the chunks of
/// compound extensions like `tar.gz`.
const ARCHIVE_EXTS: &[&str] = &["tar", "gz", "tgz", "bz2", "tbz", "zip"];

/// How to unpack a downloaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unpack {
    /// Stream through `tar` with the given extraction mode.
    Tar(&'static str),
    /// Save to disk, then run `unzip`.
    Zip,
    /// Plain download, no unpacking.
    None,
}

/// Execute the download command.
pub fn cmd_download(
    urls: &[String],
    input_file: Option<&Path>,
    jobs: usize,
    force: bool,
    dest: &Path,
) -> Result<()> {
    super::require_tool("curl")?;
    fs::create_dir_all(dest)
        .with_context(|| format!("failed to create {}", dest.display()))?;

    // URLs from the input file come first, then the command line.
    let mut all_urls = Vec::new();
    if let Some(file) = input_file {
        let content = fs::read_to_string(file)
            .with_context(|| format!("failed to read URL file {}", file.display()))?;
        all_urls.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_string),
        );
    }
    all_urls.extend(urls.iter().cloned());
    if all_urls.is_empty() {
        bail!("no URLs to download");
    }

    let mut by_host: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for url in all_urls {
        let filename = file_name_of(&url);
        let unpacked = dest.join(unpacked_dir_name(&filename));
        if unpacked.exists() {
            if force {
                fs::remove_dir_all(&unpacked)
                    .with_context(|| format!("failed to remove {}", unpacked.display()))?;
            } else {
                println!(
                    "{} already exists, skipping (use --force to redownload)",
                    unpacked.display()
                );
                continue;
            }
        }
        let host = host_of(&url)
            .with_context(|| format!("cannot determine host of URL {url:?}"))?;
        by_host.entry(host).or_default().push(url);
    }
    if by_host.is_empty() {
        return Ok(());
    }

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    runtime.block_on(download_all(by_host, jobs.max(1), dest.to_path_buf()))
}

/// One task per host, at most `jobs` hosts in flight.
async fn download_all(by_host: BTreeMap<String, Vec<String>>, jobs: usize, dest: PathBuf) -> Result<()> {
    let limit = Arc::new(Semaphore::new(jobs));
    let mut tasks = JoinSet::new();

    for (host, host_urls) in by_host {
        let limit = Arc::clone(&limit);
        let dest = dest.clone();
        tasks.spawn(async move {
            let _permit = limit
                .acquire_owned()
                .await
                .context("download semaphore closed")?;
            for url in host_urls {
                println!("[{host}] {url}");
                fetch_and_unpack(&url, &dest).await?;
            }
            Ok::<(), anyhow::Error>(())
        });
    }

    while let Some(joined) = tasks.join_next().await {
        joined.context("download task panicked")??;
    }
    Ok(())
}

async fn fetch_and_unpack(url: &str, dest: &Path) -> Result<()> {
    let filename = file_name_of(url);
    match unpack_for(&filename) {
        Unpack::Tar(mode) => {
            let mut curl = Command::new("curl")
                .args(["-L", "-f", url])
                .current_dir(dest)
                .stdout(Stdio::piped())
                .spawn()
                .context("failed to launch curl")?;
            let curl_out = curl
                .stdout
                .take()
                .context("curl stdout was not captured")?;
            let stdin: Stdio = curl_out
                .try_into()
                .context("failed to pipe curl output into tar")?;

            let mut tar = Command::new("tar")
                .args([mode, "-"])
                .current_dir(dest)
                .stdin(stdin)
                .spawn()
                .context("failed to launch tar")?;

            let (curl_status, tar_status) = tokio::join!(curl.wait(), tar.wait());
            let curl_status = curl_status.context("failed to wait for curl")?;
            let tar_status = tar_status.context("failed to wait for tar")?;
            if !curl_status.success() {
                bail!("curl failed for {url} with {curl_status}");
            }
            if !tar_status.success() {
                bail!("tar failed for {url} with {tar_status}");
            }
        }
        Unpack::Zip => {
            run_in(dest, "curl", &["-L", "-f", "-O", url]).await?;
            run_in(dest, "unzip", &["-o", &filename]).await?;
        }
        Unpack::None => {
            run_in(dest, "curl", &["-L", "-f", "-O", url]).await?;
        }
    }
    Ok(())
}

async fn run_in(dir: &Path, program: &str, args: &[&str]) -> Result<()> {
    let status = Command::new(program)
        .args(args)
        .current_dir(dir)
        .status()
        .await
        .with_context(|| format!("failed to launch {program}"))?;
    if !status.success() {
        bail!("{program} {} failed with {status}", args.join(" "));
    }
    Ok(())
}

fn unpack_for(filename: &str) -> Unpack {
    if filename.ends_with(".tar.gz") || filename.ends_with(".tgz") {
        Unpack::Tar("xzf")
    } else if filename.ends_with(".tar.bz2") || filename.ends_with(".tbz") {
        Unpack::Tar("xjf")
    } else if filename.ends_with(".zip") {
        Unpack::Zip
    } else {
        Unpack::None
    }
}

/// Directory name an archive unpacks to: the file name with every trailing
/// archive extension chunk stripped (`SurfWriter-1.0.tar.gz` ->
/// `SurfWriter-1.0`).
fn unpacked_dir_name(filename: &str) -> String {
    let mut name = filename;
    loop {
        match name.rsplit_once('.') {
            Some((stem, ext)) if ARCHIVE_EXTS.contains(&ext) && !stem.is_empty() => name = stem,
            _ => break,
        }
    }
    name.to_string()
}

/// Host component of a URL, without any port.
fn host_of(url: &str) -> Option<String> {
    let rest = url.split_once("://").map(|(_, rest)| rest)?;
    let netloc = rest.split(['/', '?']).next()?;
    if netloc.is_empty() {
        return None;
    }
    let host = match netloc.rsplit_once(':') {
        Some((host, port)) if !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()) => host,
        _ => netloc,
    };
    Some(host.to_string())
}

/// Final path component of a URL, ignoring any query string.
fn file_name_of(url: &str) -> String {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    let path = rest.split('?').next().unwrap_or(rest);
    path.rsplit('/').next().unwrap_or(path).to_string()
}
