/*!
 * Authenticated session extractor
 *
 * Responsibility:
 * - access gate が検証済みの AuthenticatedSession を handler に提供する
 *
 * Public API:
 * - AuthSessionExtractor
 */

mod core;

pub use core::AuthSessionExtractor;
