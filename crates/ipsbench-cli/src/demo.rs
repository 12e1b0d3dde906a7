// Dweve ipsbench - Iterations-per-second micro-benchmark harness
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Demo workloads: rendering a product listing with Liquid templates.
//!
//! Each template is benchmarked twice, parsed on every call and parsed once
//! up front, so the comparison shows what parsing costs relative to
//! rendering. The filtered variants push every product name through a
//! chain of standard Liquid filters.

use crate::error::CliError;
use ipsbench::{Clock, Harness};
use liquid::{Object, Parser, ParserBuilder};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{json, Value};
use std::hint::black_box;
use std::sync::Arc;

/// Product listing template.
pub const PRODUCT_TEMPLATE: &str = r#"{% for product in products %}
  <div class='product_brick'>
    <div class='container'>
      <div class='element'>
        <img src='images/{{ product.image }}' class='product_miniature' />
      </div>
      <div class='element description'>
        <a href={{ product.url }} class='product_name block bold'>
          {{ product.name }}
        </a>
      </div>
    </div>
  </div>
{% endfor %}
"#;

/// Product listing template with a filter chain on the product name.
pub const FILTERED_PRODUCT_TEMPLATE: &str = r#"{% for product in products %}
  <div class='product_brick'>
    <div class='container'>
      <div class='element'>
        <img src='images/{{ product.image }}' class='product_miniature' />
      </div>
      <div class='element description'>
        <a href={{ product.url }} class='product_name block bold'>
          {{ product.name | truncate:8 | strip_html | newline_to_br | strip_newlines | escape_once }}
        </a>
      </div>
    </div>
  </div>
{% endfor %}
"#;

/// Default number of generated products.
pub const DEFAULT_PRODUCTS: usize = 100;

/// Default seed for product generation.
pub const DEFAULT_SEED: u64 = 42;

/// A workload in the demo catalog.
#[derive(Debug, Clone, Copy)]
pub struct DemoWorkload {
    /// Registered name.
    pub name: &'static str,
    /// One-line description for `ipsbench list`.
    pub description: &'static str,
    template: &'static str,
    pre_parsed: bool,
}

/// Every demo workload, in registration order.
pub const DEMO_WORKLOADS: &[DemoWorkload] = &[
    DemoWorkload {
        name: "render_template",
        description: "parse and render the product listing on every call",
        template: PRODUCT_TEMPLATE,
        pre_parsed: false,
    },
    DemoWorkload {
        name: "render_template_pre",
        description: "render a product listing parsed once up front",
        template: PRODUCT_TEMPLATE,
        pre_parsed: true,
    },
    DemoWorkload {
        name: "render_filtered",
        description: "parse and render the listing with a name filter chain",
        template: FILTERED_PRODUCT_TEMPLATE,
        pre_parsed: false,
    },
    DemoWorkload {
        name: "render_filtered_pre",
        description: "render the pre-parsed listing with a name filter chain",
        template: FILTERED_PRODUCT_TEMPLATE,
        pre_parsed: true,
    },
];

/// Generates `count` random products under a `products` key.
///
/// The same seed always yields the same data.
pub fn generate_products(count: usize, seed: u64) -> Value {
    let mut rng = StdRng::seed_from_u64(seed);
    let products: Vec<Value> = (0..count)
        .map(|_| {
            json!({
                "image": format!("foo-{}.png", rng.gen_range(0..100)),
                "url": format!("http://bar-{}.com", rng.gen_range(0..100)),
                "name": format!("FOO {}", "a".repeat(rng.gen_range(0..100))),
            })
        })
        .collect();
    json!({ "products": products })
}

/// Resolves requested names against the catalog.
///
/// An empty request selects every workload. Otherwise workloads come back
/// in the requested order.
pub fn select(names: &[String]) -> Result<Vec<&'static DemoWorkload>, CliError> {
    if names.is_empty() {
        return Ok(DEMO_WORKLOADS.iter().collect());
    }

    names
        .iter()
        .map(|name| {
            DEMO_WORKLOADS
                .iter()
                .find(|w| w.name == name.as_str())
                .ok_or_else(|| CliError::UnknownWorkload {
                    name: name.clone(),
                    available: DEMO_WORKLOADS
                        .iter()
                        .map(|w| w.name)
                        .collect::<Vec<_>>()
                        .join(", "),
                })
        })
        .collect()
}

/// Converts generated product data into Liquid globals.
pub fn template_globals(data: &Value) -> Result<Object, CliError> {
    liquid::model::to_object(data).map_err(|err| CliError::Globals {
        message: err.to_string(),
    })
}

fn parser_for(workload: &DemoWorkload) -> Result<Parser, CliError> {
    ParserBuilder::with_stdlib()
        .build()
        .map_err(|err| CliError::template(workload.name, &err))
}

/// Registers the selected demo workloads on `harness`, all rendering `data`.
///
/// Pre-parsed templates are parsed here, so a broken template fails
/// registration instead of the run.
pub fn register_demo_workloads<C: Clock>(
    harness: &mut Harness<C>,
    names: &[String],
    data: Arc<Value>,
) -> Result<(), CliError> {
    let selected = select(names)?;
    let globals = Arc::new(template_globals(&data)?);

    for workload in selected {
        let globals = Arc::clone(&globals);
        let parser = parser_for(workload)?;

        if workload.pre_parsed {
            let template = parser
                .parse(workload.template)
                .map_err(|err| CliError::template(workload.name, &err))?;
            harness.register_fallible(workload.name, move || {
                template.render(&*globals).map(|html| {
                    black_box(html);
                })
            })?;
        } else {
            let source = workload.template;
            harness.register_fallible(workload.name, move || -> Result<(), liquid::Error> {
                let html = parser.parse(source)?.render(&*globals)?;
                black_box(html);
                Ok(())
            })?;
        }
    }
    Ok(())
}
