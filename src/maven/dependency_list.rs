//! Reader for the output of `mvn dependency:list -DoutputFile=<file>`

use super::ResolvedArtifact;

/// Parses one listing line such as
/// `org.slf4j:slf4j-api:jar:1.7.36:compile -- module org.slf4j`
pub fn parse_line(line: &str) -> Option<ResolvedArtifact> {
    let line = line.trim();
    let line = line.strip_prefix("[INFO]").unwrap_or(line).trim();
    let line = line.split(" -- ").next().unwrap_or(line).trim();
    let coords = line.split_whitespace().next()?;

    let parts: Vec<&str> = coords.split(':').collect();
    let (group_id, artifact_id, packaging, classifier, version, scope) = match parts.as_slice() {
        [g, a, t, v, s] => (*g, *a, *t, None, *v, *s),
        [g, a, t, c, v, s] => (*g, *a, *t, Some(*c), *v, *s),
        _ => return None,
    };

    let valid = [group_id, artifact_id, packaging, version, scope]
        .iter()
        .all(|p| !p.is_empty())
        && scope.chars().all(|c| c.is_ascii_alphabetic());
    if !valid {
        return None;
    }

    Some(ResolvedArtifact {
        group_id: group_id.to_string(),
        artifact_id: artifact_id.to_string(),
        version: version.to_string(),
        scope: Some(scope.to_string()),
        packaging: packaging.to_string(),
        classifier: classifier.map(str::to_string),
    })
}

/// Parses a whole listing, ignoring headers and blank lines
pub fn parse(content: &str) -> Vec<ResolvedArtifact> {
    content.lines().filter_map(parse_line).collect()
}
