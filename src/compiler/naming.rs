/// Hands out `calib_<n>` style names, counting from 1.
///
/// One allocator lives in each compile call, so names never leak between
/// compilations.
#[derive(Debug)]
pub(super) struct NameAllocator {
    prefix: &'static str,
    next: u32,
}

impl NameAllocator {
    pub(super) fn new(prefix: &'static str) -> Self {
        Self { prefix, next: 1 }
    }

    pub(super) fn next_name(&mut self) -> String {
        let name = format!("{}_{}", self.prefix, self.next);
        self.next += 1;
        name
    }
}
