//! Infrastructure outputs of the stage's CloudFormation stack

use crate::error::{Result, TrainError};
use aws_sdk_cloudformation::error::DisplayErrorContext;
use aws_sdk_cloudformation::Client;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Output holding the training data bucket name
pub const BUCKET_OUTPUT_KEY: &str = "S3BucketName";

/// Output holding the role Personalize assumes to read the bucket
pub const ROLE_OUTPUT_KEY: &str = "IAMRoleArn";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackOutputs {
    stack: String,
    values: HashMap<String, String>,
}

impl StackOutputs {
    pub fn new(stack: impl Into<String>, values: HashMap<String, String>) -> Self {
        Self {
            stack: stack.into(),
            values,
        }
    }

    pub fn require(&self, key: &str) -> Result<&str> {
        self.values
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| TrainError::MissingStackOutput {
                stack: self.stack.clone(),
                key: key.to_string(),
            })
    }

    pub fn bucket(&self) -> Result<&str> {
        self.require(BUCKET_OUTPUT_KEY)
    }

    pub fn role_arn(&self) -> Result<&str> {
        self.require(ROLE_OUTPUT_KEY)
    }
}

#[instrument(skip(client))]
pub async fn fetch_stack_outputs(client: &Client, stack_name: &str) -> Result<StackOutputs> {
    let response = match client.describe_stacks().stack_name(stack_name).send().await {
        Ok(response) => response,
        Err(e) => {
            let message = DisplayErrorContext(&e).to_string();
            if message.contains("does not exist") {
                return Err(TrainError::StackNotFound {
                    stack: stack_name.to_string(),
                });
            }
            return Err(TrainError::Aws {
                operation: "DescribeStacks",
                message,
            });
        },
    };

    let stack = response
        .stacks()
        .first()
        .ok_or_else(|| TrainError::StackNotFound {
            stack: stack_name.to_string(),
        })?;

    let values: HashMap<String, String> = stack
        .outputs()
        .iter()
        .filter_map(|output| {
            Some((
                output.output_key()?.to_string(),
                output.output_value()?.to_string(),
            ))
        })
        .collect();

    debug!(outputs = values.len(), "Read stack outputs");

    Ok(StackOutputs::new(stack_name, values))
}
