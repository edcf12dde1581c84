//! 颜色列表解析.
//!
//! 颜色字符串由十进制整数或 `$` 前缀的十六进制整数组成, 以空白或逗号分隔.
//! 支持 `/* */` 与 `//` 注释. 例如:
//!
//! ```text
//! $FF0000 $00FF00 // 红, 绿
//! /* 白 */ 16777215
//! ```

use colormask_core::{DepthParams, MaskError, MaskResult};

/// 解析颜色列表, 返回打包 RGB 常量
///
/// - 8 位: 24 位打包 (`$RRGGBB`)
/// - 16 位: 48 位打包 (`$RRRRGGGGBBBB`), 十六进制写法至少 12 位
///
/// 16 位下的长度规则只计 `$` 之后的十六进制位数, 且只作用于十六进制写法.
/// 十进制写法不受长度限制, 例如 `65535` 表示蓝色通道满值. 超出打包位宽
/// 的值一律报错, 不做截断.
pub fn parse_color_list(text: &str, bits: u32) -> MaskResult<Vec<u64>> {
    let params = DepthParams::for_bits(bits)
        .ok_or_else(|| MaskError::Unsupported(format!("只支持 8 位和 16 位, 实际 {bits} 位")))?;
    let stripped = strip_comments(text)?;
    stripped
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .map(|token| parse_token(token, &params))
        .collect()
}

/// 去掉块注释与行注释, 注释位置替换为空格
fn strip_comments(text: &str) -> MaskResult<String> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    loop {
        let block = rest.find("/*");
        let line = rest.find("//");
        match (block, line) {
            (Some(b), l) if l.is_none_or(|l| b < l) => {
                out.push_str(&rest[..b]);
                out.push(' ');
                let body = &rest[b + 2..];
                let end = body
                    .find("*/")
                    .ok_or_else(|| MaskError::Parse("块注释未闭合".into()))?;
                rest = &body[end + 2..];
            }
            (_, Some(l)) => {
                out.push_str(&rest[..l]);
                out.push(' ');
                rest = match rest[l..].find('\n') {
                    Some(n) => &rest[l + n..],
                    None => "",
                };
            }
            _ => {
                out.push_str(rest);
                return Ok(out);
            }
        }
    }
}

fn parse_token(token: &str, params: &DepthParams) -> MaskResult<u64> {
    let value = if let Some(hex) = token.strip_prefix('$') {
        if hex.is_empty() || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(MaskError::Parse(format!("无效的十六进制颜色: {token}")));
        }
        if params.bits == 16 && hex.len() < 12 {
            return Err(MaskError::Parse(format!(
                "16 位颜色需要 12 位十六进制数: {token}"
            )));
        }
        u64::from_str_radix(hex, 16)
            .map_err(|e| MaskError::Parse(format!("颜色 {token} 解析失败: {e}")))?
    } else {
        if !token.chars().all(|c| c.is_ascii_digit()) {
            return Err(MaskError::Parse(format!("无效的颜色: {token}")));
        }
        token
            .parse::<u64>()
            .map_err(|e| MaskError::Parse(format!("颜色 {token} 解析失败: {e}")))?
    };

    let packed_bits = params.packed_rgb_bits();
    if value >> packed_bits != 0 {
        return Err(MaskError::Parse(format!(
            "颜色 {token} 超出 {packed_bits} 位打包范围"
        )));
    }
    Ok(value)
}
