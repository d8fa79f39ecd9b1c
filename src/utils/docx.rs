//! docx 文本抽取
//!
//! docx 是 ZIP 包，正文在 word/document.xml。这里不做完整的 OOXML 解析，
//! 只扫描 `<w:t>` 文本运行并按段落拼接，够预览和送评分用。

use std::io::{Cursor, Read};

use once_cell::sync::Lazy;
use regex::Regex;
use zip::ZipArchive;

use crate::errors::{PortalError, Result};

// 捕获文本运行内容，或匹配段落结束标记
static RUN_OR_PARA_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<w:t[^>]*>([^<]*)</w:t>|</w:p>").expect("valid regex"));

/// 从 docx 文件内容中抽取纯文本，段落之间以换行分隔
pub fn extract_docx_text(data: &[u8]) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(data))
        .map_err(|e| PortalError::file_operation(format!("无法打开 docx 文件: {e}")))?;

    let mut document_xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| PortalError::file_operation(format!("docx 缺少正文: {e}")))?
        .read_to_string(&mut document_xml)
        .map_err(|e| PortalError::file_operation(format!("读取 docx 正文失败: {e}")))?;

    let mut text = String::new();
    for capture in RUN_OR_PARA_END.captures_iter(&document_xml) {
        match capture.get(1) {
            Some(run) => text.push_str(&unescape_xml(run.as_str())),
            None => text.push('\n'),
        }
    }

    Ok(text.trim_end().to_string())
}

fn unescape_xml(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    fn build_docx(document_xml: &str) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("word/document.xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(document_xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_extracts_paragraph_text() {
        let xml = r#"<?xml version="1.0"?><w:document><w:body>
            <w:p><w:r><w:t>第一段作业内容</w:t></w:r></w:p>
            <w:p><w:r><w:t xml:space="preserve">第二段 </w:t></w:r><w:r><w:t>续写</w:t></w:r></w:p>
        </w:body></w:document>"#;

        let text = extract_docx_text(&build_docx(xml)).unwrap();
        assert_eq!(text, "第一段作业内容\n第二段 续写");
    }

    #[test]
    fn test_unescapes_entities() {
        let xml = "<w:p><w:r><w:t>a &lt; b &amp;&amp; c &gt; d</w:t></w:r></w:p>";
        let text = extract_docx_text(&build_docx(xml)).unwrap();
        assert_eq!(text, "a < b && c > d");
    }

    #[test]
    fn test_rejects_non_zip_data() {
        assert!(extract_docx_text(b"plain text, not a zip").is_err());
    }

    #[test]
    fn test_rejects_zip_without_document() {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("other.txt", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"hello").unwrap();
        let data = writer.finish().unwrap().into_inner();

        assert!(extract_docx_text(&data).is_err());
    }
}
