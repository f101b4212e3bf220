//! Full-bleed plasma field, used behind banners.

pub(crate) const SHADER_PLASMA: &str = r#"#version 300 es
precision highp float;

uniform float time;
uniform float scrollProgress;
uniform vec3 themeColor;
uniform vec3 themeColorSecondary;
uniform float diskIntensity;
uniform vec2 uPointer;

in vec2 vUv;
out vec4 fragColor;

float hash(vec2 p) {
    return fract(sin(dot(p, vec2(127.1, 311.7))) * 43758.5453);
}

float noise(vec2 p) {
    vec2 i = floor(p);
    vec2 f = fract(p);
    f = f * f * (3.0 - 2.0 * f);
    return mix(mix(hash(i), hash(i + vec2(1.0, 0.0)), f.x),
               mix(hash(i + vec2(0.0, 1.0)), hash(i + vec2(1.0, 1.0)), f.x), f.y);
}

void main() {
    vec2 uv = vUv + uPointer * 0.03;

    // Each octave drifts around a closed loop.
    float heat = noise(uv * 1.2 + vec2(cos(time * 0.5), sin(time * 0.3))) * 0.5;
    heat += noise(uv * 2.4 + vec2(cos(time * 0.8), sin(time * 0.6))) * 0.25;
    heat += noise(uv * 4.8 + vec2(cos(time * 1.2), sin(time * 0.9))) * 0.125;

    float flame = sin(time * 8.0 + uv.x * 4.0) * 0.3
                + sin(time * 12.0 + uv.y * 3.0) * 0.2
                + sin(time * 6.0 + uv.x * 5.0 + uv.y * 3.5) * 0.25;

    float surface = abs(heat * flame);
    vec3 color = mix(themeColorSecondary * 0.8, themeColor * 1.2, surface);
    color = mix(color, mix(themeColor * 1.5, themeColor * 2.5, surface), surface * 0.7);
    color *= 1.224 * diskIntensity * (0.9 + 0.2 * scrollProgress);
    color *= 0.7 + 0.3 * surface;

    fragColor = vec4(color, 0.95);
}
"#;
