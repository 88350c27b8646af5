//! # Path 模块
//!
//! 逻辑路径：相对于资源根目录、以 `/` 分隔、不带 `assets/` 前缀。
//! 配置中的模型/纹理路径，以及 glTF 里引用的外部 buffer，
//! 都先经过这里规范化，再交给 `ResourceSource`。

/// 资源根目录名；出现在逻辑路径开头时会被去掉
const ASSETS_PREFIX: &str = "assets/";

/// 规范化为逻辑路径
///
/// `\` 统一为 `/`，折叠 `.` 和 `..`，并去掉开头的 `assets/`。
/// 越过根目录的 `..` 直接丢弃。
pub fn normalize_logical_path(path: &str) -> String {
    let unified = path.replace('\\', "/");

    let parts = unified
        .split('/')
        .fold(Vec::<&str>::new(), |mut parts, segment| {
            match segment {
                "" | "." => {}
                ".." => {
                    parts.pop();
                }
                name => parts.push(name),
            }
            parts
        });

    let joined = parts.join("/");
    joined
        .strip_prefix(ASSETS_PREFIX)
        .map(str::to_string)
        .unwrap_or(joined)
}

/// 以 `base_dir` 为起点解析引用路径
///
/// glTF 的 `uri` 相对于模型文件所在目录；以 `/` 开头的引用视为相对资源根目录。
pub fn resolve_relative_path(base_dir: &str, reference: &str) -> String {
    if reference.starts_with('/') || base_dir.is_empty() {
        return normalize_logical_path(reference);
    }
    normalize_logical_path(&format!("{}/{}", base_dir, reference))
}

/// 逻辑路径的父目录；没有父目录时返回空串
pub fn extract_base_dir(path: &str) -> String {
    let logical = normalize_logical_path(path);
    logical
        .rsplit_once('/')
        .map(|(dir, _)| dir.to_string())
        .unwrap_or_default()
}
