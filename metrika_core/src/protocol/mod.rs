/*!
 * Protocol layer — what a hit looks like on the wire.
 *
 * - `constants` — collector endpoint, paths, timeouts
 * - `modes` — `browser-info` flags
 * - `resolve` — current / absolute URL resolution
 * - `encoder` — payload → form fields
 */

pub mod constants;
pub mod encoder;
pub mod modes;
pub mod resolve;
