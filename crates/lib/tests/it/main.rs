/*! Integration tests for hdata.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - node: End-to-end tree building scenarios over the node API
 * - reference: Reference transparency and cross-backend composition
 * - backend: Registry behavior and backend selection by request string
 * - query: Path queries, bulk ranges, merge/fetch/update semantics
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("hdata=debug".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod backend;
mod node;
mod query;
mod reference;
