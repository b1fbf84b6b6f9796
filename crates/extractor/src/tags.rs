use crate::types::PatternTag;

/// Keyword heuristics for design-pattern hints.
///
/// Substring checks over the raw content, deliberately cheap. A tag means
/// "smells like", nothing stronger.
#[must_use]
pub fn detect_pattern_tags(content: &str) -> Vec<PatternTag> {
    let mut tags = Vec::new();

    if content.contains("getInstance") || content.contains("_instance") {
        tags.push(PatternTag::Singleton);
    }

    if content.contains("createFactory")
        || content.contains("Factory(")
        || (content.contains("class") && content.contains("Factory"))
    {
        tags.push(PatternTag::Factory);
    }

    if content.contains("addEventListener")
        || content.contains("subscribe(")
        || content.contains("notifyAll")
        || content.contains(".emit(")
    {
        tags.push(PatternTag::Observer);
    }

    if content.contains("(req, res, next)") || content.contains("(request, response, next)") {
        tags.push(PatternTag::Middleware);
    }

    if content.contains("Repository") {
        tags.push(PatternTag::Repository);
    }

    if content.contains(".build()") || content.contains("Builder") {
        tags.push(PatternTag::Builder);
    }

    tags
}
