use crate::error::{LexiconError, Result};
use crate::models::SearchQuery;

/**
 * 查询验证器
 *
 * 在扫描开始前拒绝无法回答的请求。
 * 注意：模式语法错误不在此处拒绝，编译失败会降级为子串匹配。
 */
pub struct QueryValidator;

impl QueryValidator {
    /**
     * 验证查询
     *
     * # 参数
     * * `query` - 要验证的搜索查询
     * * `max_length` - 查询文本最大字符数
     *
     * # 返回
     * * `Ok(())` - 如果查询有效
     * * `Err(LexiconError)` - 如果查询无效
     */
    pub fn validate(query: &SearchQuery, max_length: usize) -> Result<()> {
        if query.text.trim().is_empty() {
            return Err(LexiconError::invalid_request("Query text is empty"));
        }

        let length = query.text.chars().count();
        if length > max_length {
            return Err(LexiconError::invalid_request(format!(
                "Query text is too long ({} > {} characters)",
                length, max_length
            )));
        }

        Ok(())
    }
}
