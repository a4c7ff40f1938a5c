//! Built-in signature set
//!
//! Default magic numbers covering the common document, image, archive,
//! executable, audio, video and database formats. Every entry is unique by
//! `(pattern, offset)`; formats that share a container signature (OOXML on
//! ZIP, legacy Office on CFB) are folded onto the container's entry by the
//! extension alias table instead of being listed twice.

use crate::signature::Signature;

pub(crate) fn builtin_signatures() -> Vec<Signature> {
    vec![
        // Documents
        Signature::new(*b"%PDF", "pdf", "Portable Document Format")
            .with_mime_type("application/pdf"),
        Signature::new(
            [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1],
            "doc",
            "Microsoft Compound File (DOC/XLS/PPT)",
        )
        .with_mime_type("application/msword"),
        // Images
        Signature::new([0xFF, 0xD8, 0xFF], "jpg", "JPEG image").with_mime_type("image/jpeg"),
        Signature::new(
            [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A],
            "png",
            "PNG image",
        )
        .with_mime_type("image/png"),
        Signature::new(*b"GIF87a", "gif", "GIF image (87a)").with_mime_type("image/gif"),
        Signature::new(*b"GIF89a", "gif", "GIF image (89a)").with_mime_type("image/gif"),
        Signature::new(*b"BM", "bmp", "Windows bitmap").with_mime_type("image/bmp"),
        Signature::new([0x49, 0x49, 0x2A, 0x00], "tiff", "TIFF image (little-endian)")
            .with_mime_type("image/tiff"),
        Signature::new([0x4D, 0x4D, 0x00, 0x2A], "tiff", "TIFF image (big-endian)")
            .with_mime_type("image/tiff"),
        // RIFF container formats carry a form tag at offset 8, which keeps
        // WebP, WAV and AVI apart where the bare "RIFF" prefix cannot.
        Signature::new(*b"WEBP", "webp", "WebP image")
            .with_offset(8)
            .with_mime_type("image/webp"),
        // Archives
        Signature::new([0x50, 0x4B, 0x03, 0x04], "zip", "ZIP archive")
            .with_mime_type("application/zip"),
        Signature::new([0x50, 0x4B, 0x05, 0x06], "zip", "ZIP archive (empty)")
            .with_mime_type("application/zip"),
        Signature::new([0x50, 0x4B, 0x07, 0x08], "zip", "ZIP archive (spanned)")
            .with_mime_type("application/zip"),
        Signature::new([0x52, 0x61, 0x72, 0x21, 0x1A, 0x07, 0x00], "rar", "RAR archive (v4)")
            .with_mime_type("application/x-rar-compressed"),
        Signature::new(
            [0x52, 0x61, 0x72, 0x21, 0x1A, 0x07, 0x01, 0x00],
            "rar",
            "RAR archive (v5)",
        )
        .with_mime_type("application/x-rar-compressed"),
        Signature::new([0x1F, 0x8B], "gz", "GZIP compressed data").with_mime_type("application/gzip"),
        Signature::new([0x37, 0x7A, 0xBC, 0xAF, 0x27, 0x1C], "7z", "7-Zip archive")
            .with_mime_type("application/x-7z-compressed"),
        Signature::new(*b"BZh", "bz2", "BZIP2 compressed data")
            .with_mime_type("application/x-bzip2"),
        Signature::new([0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00], "xz", "XZ compressed data")
            .with_mime_type("application/x-xz"),
        Signature::new([0x28, 0xB5, 0x2F, 0xFD], "zst", "Zstandard compressed data")
            .with_mime_type("application/zstd"),
        Signature::new(*b"ustar", "tar", "POSIX tar archive")
            .with_offset(257)
            .with_mime_type("application/x-tar"),
        // Executables
        Signature::new(*b"MZ", "exe", "Windows executable")
            .with_mime_type("application/x-msdownload"),
        Signature::new([0x7F, 0x45, 0x4C, 0x46], "elf", "ELF executable")
            .with_mime_type("application/x-executable"),
        Signature::new([0xCA, 0xFE, 0xBA, 0xBE], "class", "Java class file")
            .with_mime_type("application/java-vm"),
        Signature::new([0xFE, 0xED, 0xFA, 0xCE], "macho", "Mach-O executable (32-bit)")
            .with_mime_type("application/x-mach-binary"),
        Signature::new([0xFE, 0xED, 0xFA, 0xCF], "macho", "Mach-O executable (64-bit)")
            .with_mime_type("application/x-mach-binary"),
        Signature::new([0xCF, 0xFA, 0xED, 0xFE], "macho", "Mach-O executable (little-endian)")
            .with_mime_type("application/x-mach-binary"),
        Signature::new([0x00, 0x61, 0x73, 0x6D], "wasm", "WebAssembly binary")
            .with_mime_type("application/wasm"),
        // Audio
        Signature::new(*b"ID3", "mp3", "MP3 audio (ID3 tag)").with_mime_type("audio/mpeg"),
        Signature::new([0xFF, 0xFB], "mp3", "MP3 audio").with_mime_type("audio/mpeg"),
        Signature::new(*b"WAVE", "wav", "WAV audio")
            .with_offset(8)
            .with_mime_type("audio/wav"),
        Signature::new(*b"fLaC", "flac", "FLAC audio").with_mime_type("audio/flac"),
        Signature::new(*b"OggS", "ogg", "OGG container").with_mime_type("audio/ogg"),
        // Video
        Signature::new(*b"ftyp", "mp4", "ISO media (MP4)")
            .with_offset(4)
            .with_mime_type("video/mp4"),
        Signature::new(*b"AVI ", "avi", "AVI video")
            .with_offset(8)
            .with_mime_type("video/x-msvideo"),
        Signature::new([0x1A, 0x45, 0xDF, 0xA3], "mkv", "Matroska video")
            .with_mime_type("video/x-matroska"),
        Signature::new(*b"FLV\x01", "flv", "Flash video").with_mime_type("video/x-flv"),
        // Databases
        Signature::new(*b"SQLite format 3\x00", "sqlite", "SQLite database")
            .with_mime_type("application/x-sqlite3"),
        // Text markers
        Signature::new(*b"<!DOCTYPE html", "html", "HTML document").with_mime_type("text/html"),
        Signature::new(*b"<html", "html", "HTML document").with_mime_type("text/html"),
        Signature::new(*b"<?xml", "xml", "XML document").with_mime_type("text/xml"),
        Signature::new(*b"{", "json", "JSON document").with_mime_type("application/json"),
        Signature::new(*b"[", "json", "JSON array").with_mime_type("application/json"),
    ]
}
