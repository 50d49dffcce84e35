//! Error formatting for AWS API failures

/// Maximum length of an error message written to the log
const MAX_LOG_MESSAGE_LENGTH: usize = 300;

/// Sanitize an error message for logging
/// Truncates long messages and strips control characters
pub fn sanitize_for_log(message: &str) -> String {
    let truncated = if message.chars().count() > MAX_LOG_MESSAGE_LENGTH {
        let head: String = message.chars().take(MAX_LOG_MESSAGE_LENGTH).collect();
        format!("{}... [truncated, {} bytes total]", head, message.len())
    } else {
        message.to_string()
    };

    truncated.replace(|c: char| c.is_control(), " ")
}

/// Format an AWS API error for display to the operator
/// Security: maps error codes to generic messages instead of exposing raw API details
pub fn format_aws_error(error: &anyhow::Error) -> String {
    let error_str = format!("{:#}", error);

    if error_str.contains("AccessDenied") || error_str.contains("UnauthorizedOperation") {
        return "Permission denied. Check the IAM permissions of the viewer's credentials."
            .to_string();
    }
    if error_str.contains("NoSuchConfigurationAggregator") {
        return "Configuration aggregator not found. Check CONFIG_AGGREGATOR_NAME and AWS_REGION."
            .to_string();
    }
    if error_str.contains("ExpiredToken")
        || error_str.contains("InvalidClientTokenId")
        || error_str.contains("UnrecognizedClient")
    {
        return "AWS credentials are expired or invalid. Refresh your credentials.".to_string();
    }
    if error_str.contains("failed to load credentials")
        || error_str.contains("no providers in chain provided credentials")
    {
        return "No AWS credentials found in the environment.".to_string();
    }
    if error_str.contains("Throttling") || error_str.contains("TooManyRequests") {
        return "Rate limit exceeded. Please try again later.".to_string();
    }
    if error_str.contains("InvalidExpression")
        || error_str.contains("InvalidLimit")
        || error_str.contains("InvalidNextToken")
        || error_str.contains("Validation")
    {
        return "Invalid query. Check the request parameters.".to_string();
    }
    if error_str.contains("dispatch failure") || error_str.contains("timeout") {
        return "Could not reach AWS. Check your network connection and try again.".to_string();
    }

    "Failed to query AWS Config.".to_string()
}
