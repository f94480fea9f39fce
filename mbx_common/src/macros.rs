/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

/* #region define_cli  ****************************************************************************************/

/// syntactic sugar macro for clap based command line interface definition
/// ```text
/// define_cli! { ARGS [about="compare two images"] =
///   verbose: bool        [help="run verbose", short],
///   model: String        [help="model name", long, default_value="ModelA"],
///   src_file: String     [help="image to compare"]
/// }
///
/// fn main () {
///    let model = &ARGS.model;
///    ...
/// }
/// ```
/// expands into:
/// ```text
/// use clap::Parser;
/// use lazy_static::lazy_static;
///
/// #[derive(Parser)]
/// #[command(about = "compare two images")]
/// struct CliOpts {
///     #[arg(help = "run verbose", short)]
///     verbose: bool,
///
///     #[arg(help = "model name", long, default_value = "ModelA")]
///     model: String,
///
///     #[arg(help = "image to compare")]
///     src_file: String,
/// }
/// lazy_static! { static ref ARGS: CliOpts = CliOpts::parse(); }
/// ```
/// Clients need `clap` and `lazy_static` dependencies
#[macro_export]
macro_rules! define_cli {
    ($name:ident [ $( $sopt:ident $(= $sx:expr)? ),* ] = $( $( #[$meta:meta] )? $fname:ident : $ftype:ty [ $( $fopt:ident $(= $fx:expr)?),* ] ),* ) => {
        use clap::Parser;
        use lazy_static::lazy_static;

        #[derive(Parser)]
        #[command( $( $sopt $(=$sx)? ),* )]
        struct CliOpts {
            $(
                #[arg( $( $fopt $(=$fx)? ),* )]
                $(#[$meta])?
                $fname : $ftype,
            )*
        }
        lazy_static! { static ref $name: CliOpts = CliOpts::parse(); }
    }
}

/// make sure we exit on -h or --help before executing anything
#[macro_export]
macro_rules! check_cli {
    ($sopt:ident) => { { let _is_initialized = &*$sopt; } }
}

/* #endregion define_cli */

/// syntactic sugar macro to define thiserror Error enums:
/// ```text
/// define_error!{ pub StoreError =
///   IOError( #[from] std::io::Error ) : "IO error: {0}",
///   NotFound(String) : "object not found: {0}"
/// }
/// ```
/// will get expanded into
/// ```text
/// use thiserror;
/// pub enum StoreError {
///     #[error("IO error: {0}")]
///     IOError(#[from] std::io::Error),
///
///     #[error("object not found: {0}")]
///     NotFound(String),
/// }
/// ```
#[macro_export]
macro_rules! define_error {
    ($vis:vis $name:ident = $( $err_variant:ident ( $( $( #[$meta:meta] )? $field_type:ty),* ) : $msg_lit:literal ),*) => {
        use thiserror;
        #[derive(thiserror::Error,Debug)]
        $vis enum $name {
            $(
                #[error($msg_lit)]
                $err_variant ( $( $(#[$meta])? $field_type ),*  )
            ),*
        }
    }
}

/*
 * we intercept logging/tracing macros here to have a central place where we can remove/replace them
 */

#[macro_export]
macro_rules! trace {
    ( $($arg:tt)* ) => { $crate::tracing::trace!( $($arg)* ) }
}

#[macro_export]
macro_rules! debug {
    ( $($arg:tt)* ) => { $crate::tracing::debug!( $($arg)* ) }
}

#[macro_export]
macro_rules! info {
    ( $($arg:tt)* ) => { $crate::tracing::info!( $($arg)* ) }
}

#[macro_export]
macro_rules! warn {
    ( $($arg:tt)* ) => { $crate::tracing::warn!( $($arg)* ) }
}

#[macro_export]
macro_rules! error {
    ( $($arg:tt)* ) => { $crate::tracing::error!( $($arg)* ) }
}
