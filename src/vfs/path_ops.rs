//! POSIX-style path normalization for the synthetic namespace.

/// Resolve `input` against `cwd`, folding `.`, `..` and repeated slashes.
/// `..` at the root stays at the root: resolution never escapes the mount.
pub fn normalize(cwd: &str, input: &str) -> String {
    let joined = if input.starts_with('/') {
        input.to_string()
    } else {
        format!("{cwd}/{input}")
    };

    let mut parts: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }

    if parts.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", parts.join("/"))
    }
}

pub fn dirname(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) => "/",
        Some(i) => &path[..i],
        None => "/",
    }
}

pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or_default()
}

pub fn join(dir: &str, name: &str) -> String {
    if dir == "/" {
        format!("/{name}")
    } else {
        format!("{dir}/{name}")
    }
}

#[cfg(test)]
#[path = "../tests/vfs/path_ops_tests.rs"]
mod tests;
