//! Settings for a cluster created for a task.

use std::collections::BTreeMap;

use dbx_schema::{Describe, Schema};
use serde::{Deserialize, Serialize};

/// Worker-count bounds for an autoscaling cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoScale {
    pub min_workers: i64,
    pub max_workers: i64,
}

impl Describe for AutoScale {
    fn schema() -> Schema {
        Schema::record("AutoScale")
            .required("min_workers", Schema::integer())
            .required("max_workers", Schema::integer())
            .build()
    }
}

/// How AWS instances are acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AwsAvailability {
    Spot,
    OnDemand,
    SpotWithFallback,
}

impl Describe for AwsAvailability {
    fn schema() -> Schema {
        Schema::enumeration("AwsAvailability", ["SPOT", "ON_DEMAND", "SPOT_WITH_FALLBACK"])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AwsAttributes {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_on_demand: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<AwsAvailability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_profile_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spot_bid_price_percent: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ebs_volume_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ebs_volume_count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ebs_volume_size: Option<i64>,
}

impl Describe for AwsAttributes {
    fn schema() -> Schema {
        Schema::record("AwsAttributes")
            .optional("first_on_demand", Schema::integer())
            .optional("availability", AwsAvailability::schema())
            .optional("zone_id", Schema::string())
            .optional("instance_profile_arn", Schema::string())
            .optional("spot_bid_price_percent", Schema::integer())
            .optional("ebs_volume_type", Schema::string())
            .optional("ebs_volume_count", Schema::integer())
            .optional("ebs_volume_size", Schema::integer())
            .build()
    }
}

/// A cluster created for the run and torn down after it.
///
/// `spark_conf` values are kept as given (`"spark.speculation": true` stays a
/// boolean until the payload is coerced for the wire).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewCluster {
    pub spark_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_type_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_node_type_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_workers: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoscale: Option<AutoScale>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spark_conf: Option<BTreeMap<String, serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws_attributes: Option<AwsAttributes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_public_keys: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_tags: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spark_env_vars: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_elastic_disk: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_pool_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver_instance_pool_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_id: Option<String>,
}

impl Describe for NewCluster {
    fn schema() -> Schema {
        Schema::record("NewCluster")
            .required("spark_version", Schema::string())
            .optional("node_type_id", Schema::string())
            .optional("driver_node_type_id", Schema::string())
            .optional("num_workers", Schema::integer())
            .optional("autoscale", AutoScale::schema())
            .optional("spark_conf", Schema::map_of(Schema::scalar()))
            .optional("aws_attributes", AwsAttributes::schema())
            .optional("ssh_public_keys", Vec::<String>::schema())
            .optional("custom_tags", Schema::map_of(Schema::string()))
            .optional("spark_env_vars", Schema::map_of(Schema::string()))
            .optional("enable_elastic_disk", Schema::boolean())
            .optional("instance_pool_id", Schema::string())
            .optional("driver_instance_pool_id", Schema::string())
            .optional("policy_id", Schema::string())
            .build()
    }
}
