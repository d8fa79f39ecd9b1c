//! 上传文件名处理
//!
//! 扩展名白名单校验与落盘文件名生成。落盘名 = UTC `%Y%m%d_%H%M%S_` 时间戳
//! 前缀 + 清洗后的原始文件名，原始文件名另行存库用于下载时还原。

/// 提取小写扩展名（不含点号）
pub fn file_extension(filename: &str) -> Option<String> {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);
    name.rsplit_once('.')
        .map(|(stem, ext)| (stem, ext.to_lowercase()))
        .filter(|(stem, ext)| !stem.is_empty() && !ext.is_empty())
        .map(|(_, ext)| ext)
}

/// 检查文件名扩展名是否在白名单内
pub fn is_allowed_extension(filename: &str, allowed: &[String]) -> bool {
    match file_extension(filename) {
        Some(ext) => allowed.iter().any(|a| a.eq_ignore_ascii_case(&ext)),
        None => false,
    }
}

/// 清洗原始文件名：去掉路径部分，替换不安全字符
pub fn sanitize_filename(filename: &str) -> String {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);

    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    // 防止清洗后得到隐藏文件名或空名
    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

/// 生成落盘文件名
pub fn stored_filename(original: &str) -> String {
    let prefix = chrono::Utc::now().format("%Y%m%d_%H%M%S_");
    format!("{}{}", prefix, sanitize_filename(original))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<String> {
        vec!["txt", "pdf", "doc", "docx"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_extension_extraction() {
        assert_eq!(file_extension("report.DocX"), Some("docx".to_string()));
        assert_eq!(file_extension("archive.tar.gz"), Some("gz".to_string()));
        assert_eq!(file_extension("no_extension"), None);
        assert_eq!(file_extension(".gitignore"), None);
    }

    #[test]
    fn test_allow_list() {
        assert!(is_allowed_extension("作业.docx", &allowed()));
        assert!(is_allowed_extension("notes.TXT", &allowed()));
        assert!(!is_allowed_extension("script.py", &allowed()));
        assert!(!is_allowed_extension("noext", &allowed()));
    }

    #[test]
    fn test_sanitize_strips_path_components() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("dir\\file.txt"), "file.txt");
        assert_eq!(sanitize_filename("a b?.txt"), "a_b_.txt");
        assert_eq!(sanitize_filename("第一次作业.docx"), "第一次作业.docx");
    }

    #[test]
    fn test_sanitize_never_empty() {
        assert_eq!(sanitize_filename("..."), "file");
        assert_eq!(sanitize_filename(""), "file");
    }

    #[test]
    fn test_stored_filename_has_timestamp_prefix() {
        let stored = stored_filename("作业.docx");
        assert!(stored.ends_with("_作业.docx"));
        // 20250820_153045_ 形式的前缀
        assert_eq!(stored.chars().take_while(|c| *c != '作').count(), 16);
    }
}
