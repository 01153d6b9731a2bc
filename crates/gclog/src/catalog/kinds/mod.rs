mod application;
mod cms;
mod g1;
mod par_new;
mod parallel;
mod verbose;

pub(crate) use application::{application_concurrent_time, application_stopped_time};
pub(crate) use cms::{cms_concurrent, cms_concurrent_start, cms_initial_mark, cms_remark};
pub(crate) use g1::{g1_full_gc, g1_remark, g1_young_initial_mark, g1_young_pause};
pub(crate) use par_new::par_new;
pub(crate) use parallel::{parallel_old_compacting, parallel_scavenge, parallel_serial_old};
pub(crate) use verbose::{verbose_gc_old, verbose_gc_young};
