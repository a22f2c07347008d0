/// A captured camera frame: contiguous RGB bytes in row-major order.
///
/// The scan loop keeps a single `Frame` as its capture buffer and reshapes
/// it every cycle, since the camera may change resolution mid-stream.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            byte_len(width, height, channels),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    /// A zero-sized buffer, ready to be reshaped on first capture.
    pub fn empty(channels: u8) -> Self {
        Self::new(Vec::new(), 0, 0, channels, 0)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Resizes the pixel storage to exactly `width * height * channels`
    /// bytes and stamps the frame with a new capture index.
    ///
    /// Existing allocation is reused when large enough.
    pub fn reshape(&mut self, width: u32, height: u32, index: usize) {
        self.data.resize(byte_len(width, height, self.channels), 0);
        self.width = width;
        self.height = height;
        self.index = index;
    }
}

fn byte_len(width: u32, height: u32, channels: u8) -> usize {
    (width as usize) * (height as usize) * (channels as usize)
}
