//! Substring-based risk classification

use super::types::RiskLevel;

/// Patterns that make an operation High risk when found in either the
/// operation or the resource
const HIGH_RISK_PATTERNS: &[&str] = &[
    "rm -rf",
    "delete",
    "drop",
    "truncate",
    "format",
    "sudo",
    "chmod 777",
    "system",
    "eval",
];

/// Patterns that make an operation Medium risk; checked against the
/// operation only
const MEDIUM_RISK_PATTERNS: &[&str] = &["write", "modify", "execute", "chmod", "chown", "git push"];

/// Classify an operation/resource pair
///
/// Case-insensitive. The resource only contributes at the High tier.
pub fn assess_risk(operation: &str, resource: &str) -> RiskLevel {
    let operation = operation.to_lowercase();
    let resource = resource.to_lowercase();

    if HIGH_RISK_PATTERNS
        .iter()
        .any(|p| operation.contains(p) || resource.contains(p))
    {
        return RiskLevel::High;
    }

    if MEDIUM_RISK_PATTERNS.iter().any(|p| operation.contains(p)) {
        return RiskLevel::Medium;
    }

    RiskLevel::Low
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_high_risk() {
        assert_eq!(assess_risk("rm -rf /", "/"), RiskLevel::High);
        assert_eq!(assess_risk("sudo x", "y"), RiskLevel::High);
        assert_eq!(assess_risk("DROP TABLE users", "db"), RiskLevel::High);
    }

    #[test]
    fn test_high_risk_from_resource() {
        assert_eq!(assess_risk("read file", "/tmp/delete_me"), RiskLevel::High);
        assert_eq!(assess_risk("run", "Eval(code)"), RiskLevel::High);
    }

    #[test]
    fn test_high_wins_over_medium() {
        assert_eq!(assess_risk("write then delete", "/tmp/x"), RiskLevel::High);
        assert_eq!(assess_risk("chmod 777", "/tmp/x"), RiskLevel::High);
    }

    #[test]
    fn test_medium_risk() {
        assert_eq!(assess_risk("write file", "/tmp/x"), RiskLevel::Medium);
        assert_eq!(assess_risk("Execute script", "build.sh"), RiskLevel::Medium);
        assert_eq!(assess_risk("git push origin main", "."), RiskLevel::Medium);
        assert_eq!(assess_risk("chown", "/srv"), RiskLevel::Medium);
    }

    #[test]
    fn test_resource_ignored_for_medium() {
        assert_eq!(assess_risk("read file", "/tmp/write.txt"), RiskLevel::Low);
        assert_eq!(assess_risk("list", "git push"), RiskLevel::Low);
    }

    #[test]
    fn test_low_risk() {
        assert_eq!(assess_risk("read file", "/tmp/x"), RiskLevel::Low);
        assert_eq!(assess_risk("", ""), RiskLevel::Low);
    }
}
