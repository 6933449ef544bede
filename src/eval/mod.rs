// Author: Dustin Pilgrim
// License: MIT

//! Schema-driven evaluation of a document body into an [`EvalContext`].
//!
//! A document is evaluated in passes over the same context. Lenient passes
//! skip attributes whose expressions cannot be evaluated yet (typically a
//! reference to a block that appears later in the document); the final strict
//! pass re-evaluates everything and fails on whatever is still unresolved.
//! Structural problems (schema violations) are always fatal and are checked
//! before any expression is evaluated.

use tracing::{debug, trace};

use crate::context::{join_path, EvalContext};
use crate::document::{Attribute, Block, Body};
use crate::schema::{BodySchema, SchemaRegistry};
use crate::ConfigError;

/// Whether an unresolvable expression is deferred or fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Lenient,
    Strict,
}

pub struct Evaluator<'r> {
    registry: &'r SchemaRegistry,
    lenient_passes: usize,
}

impl Default for Evaluator<'static> {
    fn default() -> Self {
        Self::new(SchemaRegistry::builtin())
    }
}

impl<'r> Evaluator<'r> {
    /// One lenient pass followed by one strict pass.
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self { registry, lenient_passes: 1 }
    }

    /// Run `passes` lenient passes before the strict one. Each extra pass
    /// settles one more level of forward-reference chains.
    pub fn with_lenient_passes(mut self, passes: usize) -> Self {
        self.lenient_passes = passes;
        self
    }

    pub fn registry(&self) -> &'r SchemaRegistry {
        self.registry
    }

    pub fn lenient_passes(&self) -> usize {
        self.lenient_passes
    }

    /// Evaluate a whole document into a fresh context.
    pub fn build(&self, root: &Body) -> Result<EvalContext, ConfigError> {
        let mut ctx = EvalContext::new();
        self.build_into(&mut ctx, root)?;
        Ok(ctx)
    }

    /// Evaluate a whole document into `ctx`, which may carry seeded variables.
    pub fn build_into(&self, ctx: &mut EvalContext, root: &Body) -> Result<(), ConfigError> {
        self.validate(root, "", &[])?;

        for round in 1..=self.lenient_passes {
            debug!(round, "lenient pass");
            self.evaluate(ctx, root, "", &[], Pass::Lenient)?;
        }

        debug!("strict pass");
        self.evaluate(ctx, root, "", &[], Pass::Strict)?;
        debug!(variables = ctx.len(), "document evaluated");
        Ok(())
    }

    /// Check the whole body tree against the schemas without evaluating
    /// anything.
    pub fn validate(&self, body: &Body, block_type: &str, namespace: &[String]) -> Result<(), ConfigError> {
        let Some(schema) = self.registry.lookup(block_type) else {
            return Ok(());
        };

        let content = body.content(schema, &join_path(namespace, ""))?;
        for block in &content.blocks {
            let child = child_namespace(schema, block, namespace)?;
            self.validate(&block.body, &block.block_type, &child)?;
        }
        Ok(())
    }

    /// Evaluate one body of type `block_type` and merge its attributes under
    /// `namespace` (empty for the root).
    ///
    /// Bodies without a schema contribute their attributes only; nested
    /// blocks are visited for schema-constrained bodies alone.
    pub fn evaluate(
        &self,
        ctx: &mut EvalContext,
        body: &Body,
        block_type: &str,
        namespace: &[String],
        pass: Pass,
    ) -> Result<(), ConfigError> {
        let Some(schema) = self.registry.lookup(block_type) else {
            for attr in body.just_attributes() {
                resolve_attribute(ctx, &attr, namespace, pass)?;
            }
            return Ok(());
        };

        let content = body.content(schema, &join_path(namespace, ""))?;

        for attr in &content.attributes {
            resolve_attribute(ctx, attr, namespace, pass)?;
        }

        for block in &content.blocks {
            let child = child_namespace(schema, block, namespace)?;
            trace!(block_type = %block.block_type, namespace = %child.join("."), "entering block");
            self.evaluate(ctx, &block.body, &block.block_type, &child, pass)?;
        }

        Ok(())
    }
}

/// Evaluate `root` with the builtin schemas and the default two passes.
pub fn build_configuration_tree(root: &Body) -> Result<EvalContext, ConfigError> {
    Evaluator::default().build(root)
}

fn child_namespace(schema: &BodySchema, block: &Block, namespace: &[String]) -> Result<Vec<String>, ConfigError> {
    let key = schema
        .block_header(&block.block_type)
        .and_then(|header| header.namespace_key(&block.labels))
        .ok_or_else(|| ConfigError::StructuralError {
            message: format!(
                "Block '{}' has {} label(s), which does not match its declaration",
                block.block_type,
                block.labels.len()
            ),
            path: join_path(namespace, ""),
            hint: None,
            code: Some(604),
        })?;

    let mut child = namespace.to_vec();
    child.push(key);
    Ok(child)
}

fn resolve_attribute(
    ctx: &mut EvalContext,
    attr: &Attribute,
    namespace: &[String],
    pass: Pass,
) -> Result<(), ConfigError> {
    match attr.expr.evaluate(ctx) {
        Ok(value) => ctx.merge(namespace, &attr.name, value),
        Err(diag) => match pass {
            Pass::Strict => Err(ConfigError::UnresolvedExpression {
                message: diag.to_string(),
                path: join_path(namespace, &attr.name),
                hint: diag.hint(),
                code: Some(diag.code()),
            }),
            Pass::Lenient => {
                trace!(path = %join_path(namespace, &attr.name), reason = %diag, "deferring attribute");
                Ok(())
            }
        },
    }
}
