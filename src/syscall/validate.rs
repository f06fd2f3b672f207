//! System Call Input Validation
//!
//! Checks a memsort request before any kernel memory is allocated.
//!
//! # Security Principles
//! - Validate ALL inputs before use
//! - Fail-secure: deny by default
//! - Prevent common vulnerabilities:
//!   - Null pointer dereference (explicit checks)
//!   - Size arithmetic overflow (checked multiplication)
//!   - Kernel memory disclosure (both buffers must be user memory)
//!
//! # Check Order
//! 1. Source pointer is non-null
//! 2. Destination pointer is non-null
//! 3. Count is positive
//! 4. Byte size does not overflow
//! 5. Source range is writable user memory
//! 6. Destination range is writable user memory

use core::mem::size_of;

use super::memsort::MemsortError;
use crate::diag::DiagnosticSink;
use crate::mm::{Access, UserAddr, UserMemory};

/// Raw arguments of a memsort call, as received from user space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request {
    /// User address of the values to sort.
    pub source: UserAddr,
    /// Number of `i32` elements (not bytes).
    pub count: i32,
    /// User address that receives the sorted values.
    pub destination: UserAddr,
}

/// A request that passed every check.
///
/// This type is only constructed by [`validate_request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedRequest {
    source: UserAddr,
    destination: UserAddr,
    count: usize,
    byte_len: usize,
}

impl ValidatedRequest {
    pub fn source(&self) -> UserAddr {
        self.source
    }

    pub fn destination(&self) -> UserAddr {
        self.destination
    }

    /// Element count, always at least one.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Size of either buffer in bytes.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }
}

/// Validate a memsort request.
///
/// Emits one warning naming the first failed check. Never allocates.
pub fn validate_request<U, D>(
    user: &U,
    diag: &D,
    request: &Request,
) -> Result<ValidatedRequest, MemsortError>
where
    U: UserMemory + ?Sized,
    D: DiagnosticSink + ?Sized,
{
    if request.source.is_null() {
        diag.warn(format_args!("null source pointer\n"));
        return Err(MemsortError::NullArgument);
    }

    if request.destination.is_null() {
        diag.warn(format_args!("null destination pointer\n"));
        return Err(MemsortError::NullArgument);
    }

    let count = match usize::try_from(request.count) {
        Ok(count) if count > 0 => count,
        _ => {
            diag.warn(format_args!("invalid size {}\n", request.count));
            return Err(MemsortError::InvalidSize);
        }
    };

    let byte_len = match count.checked_mul(size_of::<i32>()) {
        Some(len) => len,
        None => {
            diag.warn(format_args!("size of {} elements overflows\n", count));
            return Err(MemsortError::AddressSpaceViolation);
        }
    };

    check_region(user, diag, "source", request.source, byte_len)?;
    check_region(user, diag, "destination", request.destination, byte_len)?;

    Ok(ValidatedRequest {
        source: request.source,
        destination: request.destination,
        count,
        byte_len,
    })
}

fn check_region<U, D>(
    user: &U,
    diag: &D,
    name: &str,
    addr: UserAddr,
    len: usize,
) -> Result<(), MemsortError>
where
    U: UserMemory + ?Sized,
    D: DiagnosticSink + ?Sized,
{
    if user.access_ok(addr, len, Access::WRITE) {
        return Ok(());
    }
    diag.warn(format_args!(
        "{} buffer {} (+{} bytes) is not writable user memory\n",
        name, addr, len
    ));
    Err(MemsortError::AddressSpaceViolation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::tests::RecordingSink;
    use crate::diag::NullSink;
    use crate::mm::sim::SimulatedUserSpace;
    use crate::mm::PAGE_SIZE;

    const BASE: UserAddr = UserAddr::new(0x4000_0000);

    fn space() -> SimulatedUserSpace {
        SimulatedUserSpace::new(BASE, 2)
    }

    fn request(space: &SimulatedUserSpace, count: i32) -> Request {
        Request {
            source: space.addr(0),
            count,
            destination: space.addr(PAGE_SIZE),
        }
    }

    #[test]
    fn test_valid_request() {
        let space = space();
        let validated = validate_request(&space, &NullSink, &request(&space, 5)).unwrap();
        assert_eq!(validated.count(), 5);
        assert_eq!(validated.byte_len(), 20);
        assert_eq!(validated.source(), space.addr(0));
        assert_eq!(validated.destination(), space.addr(PAGE_SIZE));
    }

    #[test]
    fn test_null_pointers() {
        let space = space();
        let sink = RecordingSink::default();

        let mut req = request(&space, 4);
        req.source = UserAddr::null();
        assert_eq!(
            validate_request(&space, &sink, &req),
            Err(MemsortError::NullArgument)
        );

        let mut req = request(&space, 4);
        req.destination = UserAddr::null();
        assert_eq!(
            validate_request(&space, &sink, &req),
            Err(MemsortError::NullArgument)
        );

        assert_eq!(
            sink.warnings(),
            vec!["null source pointer", "null destination pointer"]
        );
    }

    #[test]
    fn test_non_positive_sizes() {
        let space = space();
        for count in [0, -1, i32::MIN] {
            assert_eq!(
                validate_request(&space, &NullSink, &request(&space, count)),
                Err(MemsortError::InvalidSize)
            );
        }
    }

    #[test]
    fn test_null_checked_before_size() {
        let space = space();
        let sink = RecordingSink::default();
        let req = Request {
            source: UserAddr::null(),
            count: 0,
            destination: UserAddr::null(),
        };
        assert_eq!(
            validate_request(&space, &sink, &req),
            Err(MemsortError::NullArgument)
        );
        assert_eq!(sink.warnings().len(), 1);
    }

    #[test]
    fn test_region_outside_space() {
        let space = space();
        let sink = RecordingSink::default();

        let req = Request {
            source: UserAddr::new(0x1000),
            count: 4,
            destination: space.addr(0),
        };
        assert_eq!(
            validate_request(&space, &sink, &req),
            Err(MemsortError::AddressSpaceViolation)
        );
        assert!(sink.warnings()[0].starts_with("source buffer"));
    }

    #[test]
    fn test_region_too_short_for_count() {
        let space = space();
        // Destination page holds 1024 values; ask for one more
        let req = request(&space, (PAGE_SIZE / 4) as i32 + 1);
        assert_eq!(
            validate_request(&space, &NullSink, &req),
            Err(MemsortError::AddressSpaceViolation)
        );
    }

    #[test]
    fn test_read_only_destination() {
        let space = space();
        let sink = RecordingSink::default();
        space.protect(space.addr(PAGE_SIZE), PAGE_SIZE, Access::READ);

        assert_eq!(
            validate_request(&space, &sink, &request(&space, 4)),
            Err(MemsortError::AddressSpaceViolation)
        );
        assert!(sink.warnings()[0].starts_with("destination buffer"));
    }

    #[test]
    fn test_read_only_source_rejected() {
        let space = space();
        space.protect(space.addr(0), PAGE_SIZE, Access::READ);
        assert_eq!(
            validate_request(&space, &NullSink, &request(&space, 4)),
            Err(MemsortError::AddressSpaceViolation)
        );
    }
}
