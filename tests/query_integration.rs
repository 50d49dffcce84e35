//! Query executor and per-kind query functions against a fake aggregator

mod common;

use cfgview::resource::execute_query;
use cfgview::resource::kinds::{
    query_ec2_instances, query_iam_users, query_lambda_functions, query_network_interfaces,
    query_vpcs,
};
use cfgview::resource::SearchParams;
use common::{instance_row, row, FakeAggregator, FakeIdentity};
use serde_json::json;

const EC2: &str = "AWS::EC2::Instance";

fn three_pages() -> FakeAggregator {
    FakeAggregator::new().with_pages(
        EC2,
        vec![
            vec![
                instance_row("111111111111", "i-001", "10.0.0.1", Some("web-01")),
                instance_row("111111111111", "i-002", "10.0.0.2", Some("db-01")),
            ],
            vec![instance_row("222222222222", "i-003", "10.1.0.3", Some("Web-02"))],
            vec![instance_row("111111111111", "i-004", "10.0.0.4", None)],
        ],
    )
}

#[tokio::test]
async fn test_pagination_concatenates_in_order() {
    let aggregator = three_pages();
    let batch = execute_query(&aggregator, EC2).await.unwrap();

    let ids: Vec<&str> = batch.records.iter().map(|r| r.resource_id.as_str()).collect();
    assert_eq!(ids, vec!["i-001", "i-002", "i-003", "i-004"]);
    assert!(batch.failures.is_empty());
    assert_eq!(
        aggregator.tokens_seen(),
        vec![None, Some("page-1".to_string()), Some("page-2".to_string())]
    );
}

#[tokio::test]
async fn test_no_filters_returns_every_record() {
    let aggregator = three_pages();
    let instances = query_ec2_instances(&aggregator, &SearchParams::default())
        .await
        .unwrap();
    assert_eq!(instances.len(), 4);
    assert_eq!(instances[3].name, "");
}

#[tokio::test]
async fn test_filters_are_case_insensitive_and_anded() {
    let aggregator = three_pages();
    let mut params = SearchParams::default();
    params.name = Some("WEB".into());

    let instances = query_ec2_instances(&aggregator, &params).await.unwrap();
    let ids: Vec<&str> = instances.iter().map(|i| i.instance_id.as_str()).collect();
    assert_eq!(ids, vec!["i-001", "i-003"]);

    params.account_id = Some("111111111111".into());
    let instances = query_ec2_instances(&aggregator, &params).await.unwrap();
    assert_eq!(instances.len(), 1);
    assert_eq!(instances[0].instance_id, "i-001");
}

#[tokio::test]
async fn test_full_width_ip_filter_matches() {
    let aggregator = three_pages();
    let mut params = SearchParams::default();
    params.ip_address = Some("１０.１".into());

    let instances = query_ec2_instances(&aggregator, &params).await.unwrap();
    assert_eq!(instances.len(), 1);
    assert_eq!(instances[0].instance_id, "i-003");
}

#[tokio::test]
async fn test_malformed_rows_are_skipped() {
    let aggregator = FakeAggregator::new().with_pages(
        "AWS::EC2::VPC",
        vec![vec![
            row("111111111111", "us-east-1", "vpc-good", json!({"cidrBlock": "10.0.0.0/16"}), Some("main")),
            "{this is not json".to_string(),
            json!({
                "accountId": "111111111111",
                "awsRegion": "us-east-1",
                "resourceId": "vpc-bad-config",
                "configuration": "{\"cidrBlock\": "
            })
            .to_string(),
            row("111111111111", "us-east-1", "vpc-other", json!({"isDefault": true}), None),
        ]],
    );

    let vpcs = query_vpcs(&aggregator, &SearchParams::default()).await.unwrap();
    let ids: Vec<&str> = vpcs.iter().map(|v| v.vpc_id.as_str()).collect();
    assert_eq!(ids, vec!["vpc-good", "vpc-other"]);
    assert!(vpcs[1].is_default);
}

#[tokio::test]
async fn test_wrong_typed_fields_keep_the_record() {
    let aggregator = FakeAggregator::new()
        .with_pages(
            "AWS::EC2::VPC",
            vec![vec![
                row("111111111111", "us-east-1", "vpc-a", json!({"cidrBlock": "10.0.0.0/16", "isDefault": "false"}), None),
                row("111111111111", "us-east-1", "vpc-b", json!({"cidrBlock": "10.1.0.0/16"}), None),
            ]],
        )
        .with_pages(
            "AWS::Lambda::Function",
            vec![vec![row(
                "111111111111",
                "us-east-1",
                "fn-a",
                json!({"functionName": "fn-a", "timeout": 3.0, "memorySize": 256}),
                None,
            )]],
        );

    let vpcs = query_vpcs(&aggregator, &SearchParams::default()).await.unwrap();
    let ids: Vec<&str> = vpcs.iter().map(|v| v.vpc_id.as_str()).collect();
    assert_eq!(ids, vec!["vpc-a", "vpc-b"]);
    assert_eq!(vpcs[0].cidr_block, "10.0.0.0/16");
    assert!(!vpcs[0].is_default);

    let functions = query_lambda_functions(&aggregator, &SearchParams::default())
        .await
        .unwrap();
    assert_eq!(functions.len(), 1);
    assert_eq!(functions[0].function_name, "fn-a");
    assert_eq!(functions[0].timeout, 0);
    assert_eq!(functions[0].memory_size, 256);
}

#[tokio::test]
async fn test_empty_result_is_success() {
    let aggregator = FakeAggregator::new();
    let enis = query_network_interfaces(&aggregator, &SearchParams::default())
        .await
        .unwrap();
    assert!(enis.is_empty());
}

#[tokio::test]
async fn test_service_error_propagates() {
    let aggregator = FakeAggregator::new().failing_for(EC2);
    let result = query_ec2_instances(&aggregator, &SearchParams::default()).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_iam_enrichment_failure_is_isolated() {
    let user = |name: &str| {
        row(
            "123456789012",
            "global",
            &format!("AIDA{}", name.to_uppercase()),
            json!({"userName": name, "arn": format!("arn:aws:iam::123456789012:user/{}", name)}),
            None,
        )
    };
    let aggregator = FakeAggregator::new().with_pages(
        "AWS::IAM::User",
        vec![vec![user("alice"), user("mallory"), user("deploy")]],
    );
    let identity = FakeIdentity {
        failing_keys: ["mallory".to_string()].into_iter().collect(),
        active_keys: ["deploy".to_string()].into_iter().collect(),
    };

    let users = query_iam_users(&aggregator, &identity, &SearchParams::default())
        .await
        .unwrap();

    assert_eq!(users.len(), 3);
    assert_eq!(users[0].access_key_status, "None");
    assert_eq!(users[1].user_name, "mallory");
    assert_eq!(users[1].access_key_status, "Unknown");
    assert_eq!(users[1].last_console_login, "2024-06-30T12:00:00+00:00");
    assert_eq!(users[1].arn, "arn:aws:iam::123456789012:user/mallory");
    assert_eq!(users[2].access_key_status, "Active");
}
